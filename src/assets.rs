//! Stylesheet and script references as they appear inside the HTML.
//!
//! Both documents reference the same five assets, each through a URL relative
//! to the document's own directory:
//!
//! | Asset | Preview (`temp/post.html`) | Export (`exp/post/post.html`) |
//! |---|---|---|
//! | Bootstrap CSS | `../needs/bootstrap.min.css` | `../css/post/bootstrap.min.css` |
//! | Clean Blog CSS | `../needs/clean-blog.min.css` | `../css/post/clean-blog.min.css` |
//! | jQuery | `../needs/jquery.min.js` | `../js/jquery/jquery.min.js` |
//! | Bootstrap JS | `../needs/bootstrap.min.js` | `../js/bootstrap_v3.3.7.min.js` |
//! | Clean Blog JS | `../needs/clean-blog.min.js` | `../js/clean-blog.min.js` |

/// Which of the two parallel documents a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tree {
    Preview,
    Export,
}

/// Logical asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    BootstrapCss,
    CleanBlogCss,
    JqueryJs,
    BootstrapJs,
    CleanBlogJs,
}

impl Asset {
    pub const STYLESHEETS: [Asset; 2] = [Asset::BootstrapCss, Asset::CleanBlogCss];
    pub const SCRIPTS: [Asset; 3] = [Asset::JqueryJs, Asset::BootstrapJs, Asset::CleanBlogJs];
}

/// Static asset reference table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetRefs;

impl AssetRefs {
    /// URL of `asset` relative to the document of `tree`.
    pub fn href(self, asset: Asset, tree: Tree) -> &'static str {
        match (tree, asset) {
            (Tree::Preview, Asset::BootstrapCss) => "../needs/bootstrap.min.css",
            (Tree::Preview, Asset::CleanBlogCss) => "../needs/clean-blog.min.css",
            (Tree::Preview, Asset::JqueryJs) => "../needs/jquery.min.js",
            (Tree::Preview, Asset::BootstrapJs) => "../needs/bootstrap.min.js",
            (Tree::Preview, Asset::CleanBlogJs) => "../needs/clean-blog.min.js",
            (Tree::Export, Asset::BootstrapCss) => "../css/post/bootstrap.min.css",
            (Tree::Export, Asset::CleanBlogCss) => "../css/post/clean-blog.min.css",
            (Tree::Export, Asset::JqueryJs) => "../js/jquery/jquery.min.js",
            (Tree::Export, Asset::BootstrapJs) => "../js/bootstrap_v3.3.7.min.js",
            (Tree::Export, Asset::CleanBlogJs) => "../js/clean-blog.min.js",
        }
    }

    pub fn stylesheets(self, tree: Tree) -> [&'static str; 2] {
        Asset::STYLESHEETS.map(|a| self.href(a, tree))
    }

    pub fn scripts(self, tree: Tree) -> [&'static str; 3] {
        Asset::SCRIPTS.map(|a| self.href(a, tree))
    }
}
