//! Generates the browser glue that hosts the narrative section.
//!
//! The output is a self-contained ES module defining a custom element. It
//! loads the wasm build, owns the `requestAnimationFrame` loop and every
//! document/window listener, and paints each projected scene. All state
//! lives on the Rust side; the module only forwards events and applies
//! frames.
//!
//! This module is split into:
//! - `helpers`: shared escaping and markup helpers
//! - `page`: standalone preview page (wrap_preview_page)

mod helpers;
mod page;

pub use page::wrap_preview_page;

use helpers::{generate_doodle_glyphs_js, generate_layers_html, js_string, tag_to_class_name};

/// Default custom element name.
pub const DEFAULT_TAG: &str = "narrative-section";
/// Default location of the wasm-bindgen JS shim.
pub const DEFAULT_WASM_URL: &str = "./pkg/scroll_narrative.js";

/// Generate the ES module that defines `<tag_name>`.
///
/// `wasm_url` is the wasm-bindgen `--target web` shim; it is imported
/// lazily on first connect. Optional element attributes: `config-src`
/// (URL of a JSON config), `seed` (pins the decorative layout).
pub fn wrap_host_module(tag_name: &str, wasm_url: &str) -> String {
    let class_name = tag_to_class_name(tag_name);
    let wasm_url = js_string(wasm_url);
    let layers_html = generate_layers_html();
    let doodle_glyphs = generate_doodle_glyphs_js();

    format!(
        r##"// {tag_name}.js: generated by scroll-narrative
// Import and use:
//   <script type="module" src="./{tag_name}.js"></script>
//   <{tag_name}></{tag_name}>

const WASM_URL = {wasm_url};
let wasmReady = null;

function loadWasm() {{
  if (!wasmReady) {{
    wasmReady = import(new URL(WASM_URL, import.meta.url).href).then(async (mod) => {{
      await mod.default();
      return mod;
    }});
  }}
  return wasmReady;
}}

{doodle_glyphs}

class {class_name} extends HTMLElement {{
  constructor() {{
    super();
    this.attachShadow({{ mode: 'open' }});
    this._handle = null;
    this._lastTime = 0;
    this._frames = new Set();
    this._rebuild = true;
    this._onResize = () => this._resize();
    this._onPointerMove = (e) => this._handle && this._handle.pointerMove(e.clientX, e.clientY);
    this._onGesture = () => this._handle && this._handle.userGesture();
    this._gestureArmed = false;
  }}

  connectedCallback() {{
    this._init().catch((e) => console.error('[{tag_name}]', e));
  }}

  disconnectedCallback() {{
    if (this._handle) {{
      this._handle.unmount();
      this._handle.free();
      this._handle = null;
    }}
    for (const id of this._frames) cancelAnimationFrame(id);
    this._frames.clear();
    window.removeEventListener('resize', this._onResize);
    window.removeEventListener('pointermove', this._onPointerMove);
    this._disarmGesture();
    if (this._video) this._video.pause();
  }}

  async _init() {{
    this.shadowRoot.innerHTML = `
      <style>
        :host {{ display: block; position: relative; height: 300vh; background: #fff; }}
        .sticky {{ position: sticky; top: 0; height: 100vh; overflow: hidden; }}
        .layer {{ position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; }}
        .copy {{ position: relative; z-index: 10; max-width: 40rem; text-align: center; }}
        .eyebrow {{ font-size: 0.7rem; letter-spacing: 0.3em; text-transform: uppercase; opacity: 0.4; }}
        .decor {{ position: absolute; inset: 0; pointer-events: none; }}
        .decor > * {{ position: absolute; }}
        .decor img {{ width: 100%; height: 100%; object-fit: contain; }}
        .doodle {{ color: rgba(0,0,0,0.5); }}
        .asset {{ position: relative; display: inline-block; transition: opacity 0.8s, transform 0.8s; }}
        .bg {{ position: absolute; inset: 0; width: 100%; height: 100%; object-fit: cover; }}
      </style>
      <div class="sticky">
        <div class="decor eyes"></div>
        <div class="decor doodles"></div>
{layers_html}
      </div>
    `;
    this._layers = [...this.shadowRoot.querySelectorAll('.layer')];
    this._assets = [...this.shadowRoot.querySelectorAll('.asset')];
    this._eyeBox = this.shadowRoot.querySelector('.eyes');
    this._doodleBox = this.shadowRoot.querySelector('.doodles');
    this._video = this.shadowRoot.querySelector('video');

    const wasm = await loadWasm();
    if (!this.isConnected) return;
    let config;
    const src = this.getAttribute('config-src');
    if (src) config = await (await fetch(src)).json();
    const seedAttr = this.getAttribute('seed');
    const seed = seedAttr === null ? undefined : (parseInt(seedAttr, 10) >>> 0);

    this._handle = new wasm.NarrativeHandle(this._host(), config, window.innerWidth, window.innerHeight, seed);
    window.addEventListener('resize', this._onResize);
    window.addEventListener('pointermove', this._onPointerMove, {{ passive: true }});
    this._apply(this._handle.scene());
  }}

  _host() {{
    return {{
      requestFrame: () => {{
        const id = requestAnimationFrame((t) => {{
          this._frames.delete(id);
          this._tick(id, t);
        }});
        this._frames.add(id);
        return id;
      }},
      cancelFrame: (id) => {{
        cancelAnimationFrame(id);
        this._frames.delete(id);
      }},
      setMuted: (muted) => {{ this._video.muted = muted; }},
      play: () => {{
        try {{
          const p = this._video.play();
          if (p && p.catch) p.catch(() => this._handle && this._handle.playbackRejected());
          return true;
        }} catch (_) {{
          return false;
        }}
      }},
      pause: () => this._video.pause(),
      listenForGesture: () => {{
        if (this._gestureArmed) return;
        this._gestureArmed = true;
        document.addEventListener('pointerdown', this._onGesture, {{ once: true }});
        document.addEventListener('touchstart', this._onGesture, {{ once: true, passive: true }});
      }},
      stopListeningForGesture: () => this._disarmGesture(),
    }};
  }}

  _disarmGesture() {{
    if (!this._gestureArmed) return;
    this._gestureArmed = false;
    document.removeEventListener('pointerdown', this._onGesture);
    document.removeEventListener('touchstart', this._onGesture);
  }}

  _resize() {{
    if (this._handle && this._handle.resize(window.innerWidth, window.innerHeight)) {{
      this._rebuild = true;
    }}
  }}

  _tick(id, time) {{
    if (!this._handle) return;
    const dt = this._lastTime ? Math.min((time - this._lastTime) / 1000, 0.1) : 1 / 60;
    this._lastTime = time;
    const rect = this.isConnected ? this.getBoundingClientRect() : null;
    const geometry = rect ? {{ top: rect.top, height: rect.height, viewport_height: window.innerHeight }} : null;
    const scene = this._handle.frame(id, geometry, dt);
    if (scene) this._apply(scene);
  }}

  _apply(scene) {{
    scene.layers.forEach((layer, i) => {{
      const el = this._layers[i];
      el.style.transition = `opacity ${{layer.transition_s}}s, transform ${{layer.transition_s}}s`;
      el.style.opacity = layer.opacity;
      el.style.transform = `translateY(${{layer.offset_y}}px)`;
      el.style.pointerEvents = layer.pointer_events ? 'auto' : 'none';
      el.querySelectorAll('.copy > *').forEach((line, n) => {{
        line.style.transition = `opacity 0.7s ${{0.1 * (n + 1)}}s, transform 0.7s ${{0.1 * (n + 1)}}s`;
        line.style.transform = layer.active ? 'none' : 'translateY(20px)';
      }});
    }});

    scene.assets.forEach((a, i) => {{
      const el = this._assets[i];
      el.style.transitionDelay = `${{a.delay_ms}}ms`;
      el.style.opacity = a.opacity;
      el.style.transform = `translateY(${{a.offset_y}}px)`;
    }});

    if (this._rebuild) {{
      this._build(this._eyeBox, scene.eyes, () => {{
        const img = document.createElement('img');
        img.src = scene.eye_icon;
        img.alt = '';
        return img;
      }});
      this._build(this._doodleBox, scene.doodles, (e) => {{
        const span = document.createElement('span');
        span.className = 'doodle';
        span.innerHTML = DOODLE_GLYPHS[e.kind.symbol] || '';
        return span;
      }});
      this._rebuild = false;
    }}
    this._paint(this._eyeBox, scene.eyes, 0.3);
    this._paint(this._doodleBox, scene.doodles, 0.3);

    if (this._video.getAttribute('src') !== scene.video.src) this._video.src = scene.video.src;
  }}

  _build(box, elements, make) {{
    box.replaceChildren(...elements.map((e) => {{
      const wrap = document.createElement('div');
      wrap.style.left = e.left;
      wrap.style.top = e.top;
      wrap.style.width = `${{e.size}}px`;
      wrap.style.height = `${{e.size}}px`;
      wrap.appendChild(make(e));
      return wrap;
    }}));
  }}

  _paint(box, elements, duration) {{
    const nodes = box.children;
    elements.forEach((e, i) => {{
      const el = nodes[i];
      if (!el) return;
      el.style.transition = `opacity ${{duration}}s ${{e.delay_s}}s`;
      el.style.opacity = e.opacity;
      el.style.transform = `translate(${{e.offset.x}}px, ${{e.offset.y}}px) scale(${{e.scale}}) rotate(${{e.rotation}}deg)`;
    }});
  }}
}}

if (!customElements.get('{tag_name}')) customElements.define('{tag_name}', {class_name});
export {{ {class_name} }};
export default {class_name};
"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defines_the_element() {
        let js = wrap_host_module("how-we-build", "/pkg/scroll_narrative.js");
        assert!(js.contains("class HowWeBuild extends HTMLElement"));
        assert!(js.contains("customElements.define('how-we-build', HowWeBuild)"));
        assert!(js.contains("const WASM_URL = '/pkg/scroll_narrative.js';"));
        assert!(js.contains("export default HowWeBuild;"));
    }

    #[test]
    fn teardown_releases_loop_and_listeners() {
        let js = wrap_host_module(DEFAULT_TAG, DEFAULT_WASM_URL);
        let teardown = js
            .split("disconnectedCallback()")
            .nth(1)
            .and_then(|rest| rest.split("async _init()").next())
            .expect("disconnectedCallback body");
        assert!(teardown.contains("cancelAnimationFrame"));
        assert!(teardown.contains("removeEventListener('resize'"));
        assert!(teardown.contains("removeEventListener('pointermove'"));
        assert!(teardown.contains("this._handle.unmount()"));
        assert!(teardown.contains("this._disarmGesture()"));
    }

    #[test]
    fn host_object_matches_bindings() {
        let js = wrap_host_module(DEFAULT_TAG, DEFAULT_WASM_URL);
        for method in [
            "requestFrame:",
            "cancelFrame:",
            "setMuted:",
            "play:",
            "pause:",
            "listenForGesture:",
            "stopListeningForGesture:",
        ] {
            assert!(js.contains(method), "host object lacks {method}");
        }
        assert!(js.contains("this._handle.playbackRejected()"));
        assert!(js.contains("{ once: true }"));
    }

    #[test]
    fn wasm_url_is_escaped() {
        let js = wrap_host_module(DEFAULT_TAG, "x';alert(1);//");
        assert!(js.contains(r"const WASM_URL = 'x\';alert(1);//';"));
    }
}
