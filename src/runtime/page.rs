//! Standalone preview page: the section between two spacer blocks so the
//! pinned scroll range can be exercised end to end.

use crate::util::html_escape;

/// Full HTML page that loads `module_url` and mounts `<tag_name>`.
pub fn wrap_preview_page(tag_name: &str, module_url: &str, config_url: Option<&str>) -> String {
    let tag = html_escape(tag_name);
    let module_url = html_escape(module_url);
    let config_attr = config_url
        .map(|u| format!(" config-src=\"{}\"", html_escape(u)))
        .unwrap_or_default();
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{tag} preview</title>
<style>
  * {{ margin: 0; padding: 0; box-sizing: border-box; }}
  body {{ font: 16px/1.4 system-ui, sans-serif; background: #111; color: #eee; }}
  .spacer {{ height: 100vh; display: flex; align-items: center; justify-content: center; opacity: 0.5; }}
</style>
<script type="module" src="{module_url}"></script>
</head>
<body>
<div class="spacer">scroll</div>
<{tag}{config_attr}></{tag}>
<div class="spacer">end</div>
</body>
</html>
"##
    )
}
