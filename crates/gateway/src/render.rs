//! HTML for the gateway's pages.
//!
//! A deliberately small stand-in for a template engine: one page layout, one
//! list, everything user-visible escaped.

use schema::{BookRecommendation, Category};

pub const PAGE_TITLE: &str = "Bookworm | Books for you";

/// Shown instead of the list when the recommendations call failed.
pub const UNAVAILABLE_NOTICE: &str = "Recommendations are unavailable right now. Please try again later.";

/// The home page. `notice` marks a degraded render.
pub fn home_page(category: Category, books: &[BookRecommendation], notice: Option<&str>) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{} books you may like</h1>\n", category.label()));

    if let Some(notice) = notice {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape(notice)));
    } else if books.is_empty() {
        body.push_str("<p class=\"empty\">No recommendations for you yet.</p>\n");
    }

    body.push_str("<ul class=\"recommendations\">\n");
    for book in books {
        if book.author.is_empty() {
            body.push_str(&format!("<li>{}</li>\n", escape(&book.title)));
        } else {
            body.push_str(&format!(
                "<li>{} <span class=\"author\">by {}</span></li>\n",
                escape(&book.title),
                escape(&book.author)
            ));
        }
    }
    body.push_str("</ul>\n");

    layout(&body)
}

/// A short page for rejected requests.
pub fn error_page(message: &str) -> String {
    layout(&format!(
        "<h1>Something went wrong</h1>\n<p class=\"error\">{}</p>\n",
        escape(message)
    ))
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{PAGE_TITLE}</title>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
