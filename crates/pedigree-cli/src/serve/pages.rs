//! Page bodies for the share-link server.
//!
//! Pages are read-only: registering horses happens in the terminal client.

use std::collections::HashMap;
use std::fmt::Write;

use pedigree_core::{
    page_link, share_url, Controller, Detail, Horse, HorseId, LayoutConfig, ParentLink,
    RecordStore, ShareConfig, TreeLayout, View,
};

use super::templates::{html_escape, render_page, script_json, PageKind, PLACEHOLDER_PHOTO};

const SHARED_BADGE: &str = "<span class=\"badge\">Shared view</span>";

fn badge(shared: bool) -> &'static str {
    if shared {
        SHARED_BADGE
    } else {
        ""
    }
}

/// Page for the controller's current view.
pub fn view_page<S: RecordStore>(ctl: &Controller<S>, share: &ShareConfig) -> String {
    match (ctl.view(), ctl.detail()) {
        (View::Details(_), Some(Detail::Found(horse))) => detail_page(ctl, horse, share),
        (View::Details(_), Some(Detail::NotFound(id))) => not_found_page(id, ctl.is_shared()),
        _ => list_page(ctl.horses()),
    }
}

// =============================================================================
// List
// =============================================================================

pub fn list_page(horses: &[Horse]) -> String {
    let mut body = String::from("<section class=\"panel\">\n<h1>Horses</h1>\n");

    if horses.is_empty() {
        body.push_str("<p class=\"empty\">No horses registered yet.</p>\n");
    } else {
        body.push_str(
            "<table class=\"horses\">\n<thead><tr><th>Name</th><th>Breed</th>\
             <th>Age</th><th>Sex</th></tr></thead>\n<tbody>\n",
        );
        for horse in horses {
            let _ = writeln!(
                body,
                "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>",
                html_escape(&page_link("/", &horse.id, false)),
                html_escape(&horse.name),
                html_escape(&horse.breed),
                horse.age.map(|a| a.to_string()).unwrap_or_default(),
                horse.sex.map(|s| s.as_str()).unwrap_or_default(),
            );
        }
        body.push_str("</tbody>\n</table>\n");
    }

    body.push_str("</section>\n");
    render_page("Horses", "", &body, PageKind::Plain)
}

// =============================================================================
// Details
// =============================================================================

fn parent_cell(link: ParentLink<'_>, shared: bool) -> String {
    match link {
        ParentLink::Known(parent) => format!(
            "<a href=\"{}\">{}</a>",
            html_escape(&page_link("/", &parent.id, shared)),
            html_escape(&parent.name)
        ),
        other => html_escape(other.label()),
    }
}

fn detail_page<S: RecordStore>(ctl: &Controller<S>, horse: &Horse, share: &ShareConfig) -> String {
    let shared = ctl.is_shared();
    let (father, mother) = ctl.parents(horse);
    let photo = horse.photo_url.as_deref().unwrap_or(PLACEHOLDER_PHOTO);
    let notice_ms = share.notice_ttl().as_millis();

    let mut body = String::from("<section class=\"panel\">\n<div class=\"detail\">\n");
    let _ = writeln!(
        body,
        "<img class=\"photo\" src=\"{}\" alt=\"{}\">",
        html_escape(photo),
        html_escape(&horse.name)
    );
    let _ = writeln!(body, "<div>\n<h1>{}</h1>\n<dl>", html_escape(&horse.name));
    let _ = writeln!(body, "<dt>Breed</dt><dd>{}</dd>", html_escape(&horse.breed));
    let _ = writeln!(
        body,
        "<dt>Age</dt><dd>{}</dd>",
        horse.age.map(|a| a.to_string()).unwrap_or_else(|| "Unknown".into())
    );
    let _ = writeln!(
        body,
        "<dt>Sex</dt><dd>{}</dd>",
        horse.sex.map(|s| s.as_str()).unwrap_or("Unknown")
    );
    let _ = writeln!(body, "<dt>Father</dt><dd>{}</dd>", parent_cell(father, shared));
    let _ = writeln!(body, "<dt>Mother</dt><dd>{}</dd>", parent_cell(mother, shared));
    body.push_str("</dl>\n</div>\n</div>\n<div class=\"actions\">\n");

    let _ = writeln!(
        body,
        "<a class=\"button\" href=\"{}\">View lineage</a>",
        html_escape(&page_link("/tree", &horse.id, shared))
    );
    let _ = writeln!(
        body,
        "<button class=\"button secondary\" type=\"button\" data-share=\"{}\" \
         data-notice-ms=\"{}\">Share</button>",
        html_escape(&share_url(&share.origin, &horse.id)),
        notice_ms
    );
    body.push_str("<a class=\"button secondary\" href=\"/\">Back to list</a>\n");
    body.push_str("</div>\n</section>\n");

    render_page(&horse.name, badge(shared), &body, PageKind::Plain)
}

pub fn not_found_page(id: &HorseId, shared: bool) -> String {
    let body = format!(
        "<section class=\"panel\">\n<h1>Horse not found</h1>\n\
         <p>No horse with id <code>{}</code> is registered.</p>\n\
         <div class=\"actions\"><a class=\"button\" href=\"/\">Back to list</a></div>\n\
         </section>\n",
        html_escape(id.as_str())
    );
    render_page("Not found", badge(shared), &body, PageKind::Plain)
}

// =============================================================================
// Errors
// =============================================================================

pub fn load_error_page(message: &str) -> String {
    let body = format!(
        "<section class=\"panel error\">\n<h2>Could not load horses</h2>\n\
         <p>{}</p>\n\
         <div class=\"actions\"><button class=\"button\" type=\"button\" data-retry>Retry</button></div>\n\
         </section>\n",
        html_escape(message)
    );
    render_page("Error", "", &body, PageKind::Plain)
}

// =============================================================================
// Lineage
// =============================================================================

pub fn tree_page(
    detail: Option<Detail<'_>>,
    layout: Option<&TreeLayout>,
    config: &LayoutConfig,
    shared: bool,
) -> String {
    let (Some(Detail::Found(horse)), Some(layout)) = (detail, layout) else {
        let body = "<section class=\"panel\">\n<h1>No lineage to show</h1>\n\
                    <p class=\"empty\">This horse could not be found, so there is no tree to draw.</p>\n\
                    <div class=\"actions\"><a class=\"button\" href=\"/\">Back to list</a></div>\n\
                    </section>\n";
        return render_page("Lineage", badge(shared), body, PageKind::Plain);
    };

    let hrefs: HashMap<&str, String> = layout
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), page_link("/", &node.id, shared)))
        .collect();
    let data = serde_json::json!({
        "layout": layout,
        "hrefs": hrefs,
        "minScale": config.min_scale,
        "maxScale": config.max_scale,
    });

    let mut body = String::from("<section>\n<div class=\"tree-toolbar\">\n");
    let _ = writeln!(
        body,
        "<a class=\"button secondary\" href=\"{}\">Back to details</a>",
        html_escape(&page_link("/", &horse.id, shared))
    );
    let _ = writeln!(body, "<strong>Lineage of {}</strong>", html_escape(&horse.name));
    body.push_str("<button class=\"button secondary\" id=\"tree-reset\" type=\"button\">Fit</button>\n");
    body.push_str("</div>\n<svg id=\"tree-canvas\" class=\"tree-canvas\"></svg>\n</section>\n");
    let _ = writeln!(
        body,
        "<script type=\"application/json\" id=\"tree-data\">{}</script>",
        script_json(&data)
    );

    render_page(
        &format!("Lineage of {}", horse.name),
        badge(shared),
        &body,
        PageKind::Tree,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedigree_core::{materialize, Sex};

    fn stable() -> Vec<Horse> {
        vec![
            Horse::new("1", "Trovão").with_sex(Sex::Male),
            Horse::new("2", "<Brisa>").with_sex(Sex::Female),
            Horse::new("3", "Relâmpago")
                .with_father("1")
                .with_mother("2")
                .with_photo("https://cdn/r.png"),
        ]
    }

    #[test]
    fn test_list_links_to_details() {
        let page = list_page(&stable());
        assert!(page.contains("href=\"/?id=3\""));
        assert!(page.contains("&lt;Brisa&gt;"));
        assert!(!page.contains("<Brisa>"));
    }

    #[test]
    fn test_empty_list() {
        assert!(list_page(&[]).contains("No horses registered yet."));
    }

    #[test]
    fn test_not_found_offers_way_back() {
        let page = not_found_page(&HorseId::new("99"), true);
        assert!(page.contains("Horse not found"));
        assert!(page.contains("href=\"/\""));
        assert!(page.contains("Shared view"));
    }

    #[test]
    fn test_tree_page_embeds_layout() {
        let horses = stable();
        let tree = materialize(horses.get(2), &horses, 5).unwrap();
        let config = LayoutConfig::default();
        let layout = TreeLayout::compute(&tree, &config);

        let page = tree_page(Some(Detail::Found(&horses[2])), Some(&layout), &config, true);
        assert!(page.contains("id=\"tree-data\""));
        assert!(page.contains("\"minScale\":0.3"));
        assert!(page.contains("/?id=1&shared=true"));
        assert!(page.contains("d3@7"));
    }

    #[test]
    fn test_tree_page_placeholder() {
        let page = tree_page(None, None, &LayoutConfig::default(), false);
        assert!(page.contains("No lineage to show"));
        assert!(!page.contains("tree-canvas\"></svg>"));
    }
}
