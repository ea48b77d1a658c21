//! HTML fragments for the Clean Blog post layout.
//!
//! A post document is never rendered in one piece. The builder writes the
//! opening shell when the post starts, appends one fragment per content
//! block, and writes the closing shell when the post ends:
//!
//! ```text
//! opening_shell   <!DOCTYPE html> … <header> … <article><div…><div…><div…>
//! section_heading <h2 class="section-heading">…</h2>
//! paragraph       <p>…<br>…</p>
//! quote           <blockquote>…</blockquote>
//! image           <a href="#"><img …></a><span class="caption text-muted">…</span>
//! closing_shell   </div></div></div></article><hr><footer>…</footer><script…></body></html>
//! ```
//!
//! The shells leave `html`, `body`, `article` and the three layout `div`s
//! open across calls, so those tags are emitted as pre-escaped literals.
//! Everything else goes through maud and is escaped on interpolation. Image
//! URLs are the exception: they come from the image pipeline and have been
//! checked against their tree before reaching this module.

use crate::assets::{AssetRefs, Tree};
use crate::types::PostMetadata;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const LORA_FONT: &str = "https://fonts.googleapis.com/css?family=Lora:400,700,400italic,700italic";

/// Bootstrap column used by the heading block, the article and the footer.
const COLUMN: &str = "col-lg-8 col-lg-offset-2 col-md-10 col-md-offset-1";

const ARTICLE_OPEN: &str = concat!(
    "<article>\n",
    "<div class=\"container\">\n",
    "<div class=\"row\">\n",
    "<div class=\"col-lg-8 col-lg-offset-2 col-md-10 col-md-offset-1\">\n",
);

const ARTICLE_CLOSE: &str = "</div>\n</div>\n</div>\n</article>\n";

/// Everything from the doctype to the opened article column.
pub fn opening_shell(
    site_title: &str,
    meta: &PostMetadata,
    tree: Tree,
    header_image: &str,
) -> Markup {
    html! {
        (DOCTYPE) "\n"
        (PreEscaped("<html lang=\"fr\">\n"))
        head {
            meta charset="utf-8";
            meta http-equiv="X-UA-Compatible" content="IE=edge";
            meta name="viewport" content="width=device-width, initial-scale=1";
            title { (site_title) " - " (meta.page_title) }
            @for href in AssetRefs.stylesheets(tree) {
                link href=(href) rel="stylesheet";
            }
            link href=(LORA_FONT) rel="stylesheet" type="text/css";
        }
        "\n"
        (PreEscaped("<body>\n"))
        (navbar())
        "\n"
        (header_banner(meta, header_image))
        "\n"
        (PreEscaped(ARTICLE_OPEN))
    }
}

fn navbar() -> Markup {
    html! {
        nav class="navbar navbar-default navbar-custom navbar-fixed-top" {
            div.container-fluid {
                div.navbar-header.page-scroll {
                    button.navbar-toggle type="button" data-toggle="collapse"
                        data-target="#bs-example-navbar-collapse-1" {
                        span.sr-only { "Basculer la navigation" }
                        "Menu "
                        i.fa.fa-bars {}
                    }
                    a.navbar-brand href="./index" { "< Précédent" }
                    a.navbar-brand href="./index" { "Suivant >" }
                }
                div.collapse.navbar-collapse id="bs-example-navbar-collapse-1" {
                    ul.nav.navbar-nav.navbar-right {
                        li { a href="./index" { "Home" } }
                        li { a href="./contact" { "Contact" } }
                    }
                }
            }
        }
    }
}

fn header_banner(meta: &PostMetadata, header_image: &str) -> Markup {
    html! {
        header.intro-header style={ "background-image: url('" (PreEscaped(header_image)) "')" } {
            div.container {
                div.row {
                    div class=(COLUMN) {
                        div.post-heading {
                            h1 { (meta.title) }
                            h2.subheading { (meta.subtitle) }
                            span.meta {
                                "Post par "
                                a href="#" { (meta.author) }
                                " le "
                                (meta.date)
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Closes the article, then footer, scripts and the document itself.
pub fn closing_shell(site_title: &str, tree: Tree) -> Markup {
    html! {
        (PreEscaped(ARTICLE_CLOSE))
        hr;
        "\n"
        footer {
            div.container {
                div.row {
                    div class=(COLUMN) {
                        ul class="list-inline text-center" {
                            @for network in ["twitter", "facebook", "github"] {
                                li {
                                    a href="#" {
                                        span class="fa-stack fa-lg" {
                                            i class="fa fa-circle fa-stack-2x" {}
                                            i class={ "fa fa-" (network) " fa-stack-1x fa-inverse" } {}
                                        }
                                    }
                                }
                            }
                        }
                        p class="copyright text-muted" {
                            "Copyright " (PreEscaped("&copy;")) " " (site_title)
                        }
                    }
                }
            }
        }
        "\n"
        @for src in AssetRefs.scripts(tree) {
            script src=(src) {}
            "\n"
        }
        (PreEscaped("</body>\n</html>\n"))
    }
}

pub fn section_heading(text: &str) -> Markup {
    html! {
        h2.section-heading { (text) }
        "\n"
    }
}

/// One `<br>` per line break; `\r\n` counts as a single break.
pub fn paragraph(text: &str) -> Markup {
    let normalized = text.replace("\r\n", "\n");
    html! {
        p {
            @for (i, line) in normalized.split('\n').enumerate() {
                @if i > 0 {
                    br;
                    "\n"
                }
                (line)
            }
        }
        "\n"
    }
}

pub fn quote(text: &str) -> Markup {
    html! {
        blockquote { (text) }
        "\n"
    }
}

/// `src` is inserted as given; `alt` and `caption` are escaped.
pub fn image(src: &str, alt: &str, caption: &str) -> Markup {
    html! {
        a href="#" {
            img.img-responsive src=(PreEscaped(src)) alt=(alt);
        }
        "\n"
        span class="caption text-muted" { (caption) }
        "\n"
    }
}
