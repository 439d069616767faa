//! Context rendering.
//!
//! A page context renders either as JSON (when the client asks for
//! `application/json`) or as a small HTML page. The template name travels in
//! the `x-polls-template` header either way.

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use polls_core::page::{DetailContext, IndexContext, ResultsContext};
use serde::Serialize;
use std::fmt::Write as _;

pub const TEMPLATE_HEADER: &str = "x-polls-template";

pub const EMPTY_STATE_MESSAGE: &str = "등록된 설문조사가 없습니다.";
pub const NEW_MARK: &str = "[New]";
pub const RESULTS_LINK_TEXT: &str = "투표 결과 보기";
pub const BACK_LINK_TEXT: &str = "목록으로";

/// A context that knows its template and how to draw itself as HTML.
pub trait Page: Serialize {
    const TEMPLATE: &'static str;

    fn title(&self) -> String;

    fn body(&self) -> String;
}

/// Render `ctx` for the client described by `headers`.
pub fn render<P: Page>(ctx: &P, site_title: &str, headers: &HeaderMap) -> Response {
    let mut response = if wants_json(headers) {
        Json(ctx).into_response()
    } else {
        Html(layout(site_title, &ctx.title(), &ctx.body())).into_response()
    };
    response
        .headers_mut()
        .insert(TEMPLATE_HEADER, HeaderValue::from_static(P::TEMPLATE));
    response
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

fn layout(site_title: &str, page_title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - {}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(page_title),
        escape(site_title),
        body
    )
}

/// Escape text for HTML element content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

impl Page for IndexContext {
    const TEMPLATE: &'static str = "polls/index.html";

    fn title(&self) -> String {
        "Polls".to_string()
    }

    fn body(&self) -> String {
        if self.empty {
            return format!("<p>{EMPTY_STATE_MESSAGE}</p>\n");
        }
        let mut out = String::from("<ul>\n");
        for entry in &self.question_list {
            let q = &entry.question;
            let _ = write!(
                out,
                "<li><a href=\"/polls/{}/\">{}</a>",
                q.id,
                escape(&q.question_text)
            );
            if entry.was_published_recently {
                let _ = write!(out, " {NEW_MARK}");
            }
            out.push_str("</li>\n");
        }
        out.push_str("</ul>\n");
        out
    }
}

impl Page for DetailContext {
    const TEMPLATE: &'static str = "polls/detail.html";

    fn title(&self) -> String {
        self.question.question_text.clone()
    }

    fn body(&self) -> String {
        let mut out = format!("<h1>{}</h1>\n<ul>\n", escape(&self.question.question_text));
        for choice in &self.choices {
            let _ = writeln!(out, "<li>{}</li>", escape(&choice.choice_text));
        }
        out.push_str("</ul>\n");
        let _ = writeln!(
            out,
            "<a href=\"/polls/{}/results/\">{RESULTS_LINK_TEXT}</a>",
            self.question.id
        );
        let _ = writeln!(out, "<a href=\"/polls/\">{BACK_LINK_TEXT}</a>");
        out
    }
}

impl Page for ResultsContext {
    const TEMPLATE: &'static str = "polls/results.html";

    fn title(&self) -> String {
        self.question.question_text.clone()
    }

    fn body(&self) -> String {
        let mut out = format!("<h1>{}</h1>\n<ul>\n", escape(&self.question.question_text));
        for r in &self.results {
            let _ = writeln!(
                out,
                "<p>Choice: {}</p><p>Vote Count: {}</p>",
                escape(&r.choice_text),
                r.votes
            );
        }
        out.push_str("</ul>\n");
        let _ = writeln!(
            out,
            "<a href=\"/polls/{}/\">{}</a>",
            self.question.id,
            escape(&self.question.question_text)
        );
        let _ = writeln!(out, "<a href=\"/polls/\">{BACK_LINK_TEXT}</a>");
        out
    }
}
