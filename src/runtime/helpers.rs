//! Shared JS/HTML generation helpers for the host module and preview page.

use crate::chapter::Chapter;
use crate::field::DoodleKind;
use crate::util::html_escape;

/// `narrative-section` -> `NarrativeSection`.
pub(super) fn tag_to_class_name(tag: &str) -> String {
    tag.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Escape for a single-quoted JS string literal.
pub(super) fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3c"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Markup for the three chapter layers, in chapter order.
pub(super) fn generate_layers_html() -> String {
    Chapter::ALL
        .iter()
        .map(|chapter| {
            let copy = chapter.copy();
            let i = chapter.index();
            let extra = match chapter {
                Chapter::Play => String::new(),
                Chapter::Shape => (0..crate::reveal::ASSET_COUNT)
                    .map(|a| format!("<div class=\"asset\" part=\"asset\"><slot name=\"asset-{a}\"></slot></div>"))
                    .collect::<Vec<_>>()
                    .join(""),
                Chapter::Feel => "<video class=\"bg\" loop playsinline muted preload=\"auto\"></video>".to_string(),
            };
            format!(
                "      <section class=\"layer\" data-chapter=\"{i}\">{extra}\n        <div class=\"copy\">\n          <span class=\"eyebrow\">{}</span>\n          <h2 class=\"headline\">{}</h2>\n          <p class=\"footnote\">{}</p>\n        </div>\n      </section>",
                html_escape(copy.eyebrow),
                html_escape(copy.headline),
                html_escape(copy.footnote),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// JS object literal mapping each doodle symbol to inline SVG markup.
pub(super) fn generate_doodle_glyphs_js() -> String {
    let mut lines = vec!["const DOODLE_GLYPHS = {".to_string()];
    for kind in DoodleKind::ALL {
        let (name, path) = doodle_path(kind);
        lines.push(format!(
            "  {name}: '<svg viewBox=\"0 0 50 50\" fill=\"none\" stroke=\"currentColor\" stroke-width=\"2\" stroke-linecap=\"round\"><path d=\"{path}\"/></svg>',"
        ));
    }
    lines.push("};".to_string());
    lines.join("\n")
}

fn doodle_path(kind: DoodleKind) -> (&'static str, &'static str) {
    match kind {
        DoodleKind::Pencil => ("pencil", "M10 40 L35 15 L40 20 L15 45 Z M10 40 L8 47 L15 45"),
        DoodleKind::Eraser => ("eraser", "M12 34 L30 16 L42 28 L24 46 Z M18 40 L36 22"),
        DoodleKind::Arrow => ("arrow", "M8 25 Q25 12 42 25 M34 18 L42 25 L34 31"),
        DoodleKind::Loop => ("loop", "M10 30 C10 10 40 10 35 25 C30 40 15 35 20 25 C25 15 45 20 42 35"),
        DoodleKind::Checkmark => ("checkmark", "M10 26 L20 38 L42 12"),
        DoodleKind::Cross => ("cross", "M12 12 L38 38 M38 12 L12 38"),
        DoodleKind::Scribble => ("scribble", "M6 30 Q12 12 18 30 T30 30 T42 30"),
        DoodleKind::Bracket => ("bracket", "M20 8 Q12 8 12 16 L12 22 Q12 25 8 25 Q12 25 12 28 L12 34 Q12 42 20 42"),
        DoodleKind::Controller => ("controller", "M10 20 Q10 14 16 14 L34 14 Q40 14 40 20 L42 34 Q42 40 36 38 L30 32 L20 32 L14 38 Q8 40 8 34 Z M16 22 L16 28 M13 25 L19 25"),
        DoodleKind::Pc => ("pc", "M8 10 L42 10 L42 34 L8 34 Z M20 40 L30 40 M25 34 L25 40"),
    }
}
