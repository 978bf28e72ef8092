//! Built-in copy served when a section has no stored document or the store
//! cannot be reached.

use serde_json::{json, Value};

/// Sections the public site renders.
pub const KNOWN_SECTIONS: &[&str] = &["header", "footer", "home", "about", "academy", "events", "voting"];

/// The fallback document for `section`. Unknown sections get an empty object.
pub fn default_document(section: &str) -> Value {
    match section {
        "header" => json!({
            "site_title": "Laurels",
            "logo_url": null,
            "nav": [
                {"label": "Categories", "href": "/categories"},
                {"label": "Nominees", "href": "/nominees"},
                {"label": "Events", "href": "/events"},
                {"label": "Academy", "href": "/academy"},
                {"label": "About", "href": "/about"}
            ]
        }),
        "footer" => json!({
            "copyright": "Laurels Awards",
            "contact_email": null,
            "social_links": []
        }),
        "home" => json!({
            "hero_title": "Celebrating the year's best",
            "hero_subtitle": "Browse the nominees and cast your vote.",
            "cta_label": "Vote now",
            "cta_href": "/nominees"
        }),
        "about" => json!({
            "title": "About the awards",
            "body": "The Laurels recognise outstanding artistic work chosen by the public and the academy."
        }),
        "academy" => json!({
            "title": "The Academy",
            "intro": "Meet the members who guide the awards."
        }),
        "events" => json!({
            "title": "Events",
            "intro": "Ceremonies, showcases and gatherings."
        }),
        "voting" => json!({
            "instructions": "You may vote once per nominee. A vote can be withdrawn within two hours of casting it.",
            "closed_message": "Voting is currently closed."
        }),
        _ => json!({}),
    }
}
