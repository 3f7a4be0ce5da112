//! Starter pages written by `nain init`. They carry the markup the wasm
//! bindings and the API routes expect, and nothing else.

use nain_core::SiteConfig;

fn layout(title: &str, body: &str, script: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="ko">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<header id="site-header">
  <nav><a href="/">Home</a> <a href="/work">Work</a> <a href="/contact">Contact</a></nav>
</header>
{body}
<script type="module">
import init, {{ HeaderWatcher, Lightbox, ScrollChoreography, SequencePlayer }} from "/pkg/nain_wasm.js";
await init();
const header = new HeaderWatcher(document.getElementById("site-header"), "scrolled");
{script}
</script>
</body>
</html>
"#
    )
}

fn home(config: &SiteConfig) -> String {
    let body = format!(
        r#"<section id="sequence" style="height:400vh">
  <div id="overlay" style="position:fixed;inset:0;display:flex;align-items:center;justify-content:center;background:{background}">
    <div style="width:{width}vw;max-width:{max}px;aspect-ratio:{aspect}">
      <canvas id="sequence-canvas" style="width:100%;height:100%"></canvas>
    </div>
  </div>
</section>
<section id="reveal" style="position:relative;height:150vh">
  <div id="reveal-video" style="position:fixed;inset:0;z-index:10;pointer-events:none;opacity:0">
    <video src="/background-2.mp4" autoplay loop muted playsinline preload="auto" style="position:absolute;inset:0;width:100%;height:100%;object-fit:cover"></video>
    <div id="reveal-cta" style="position:absolute;right:4rem;top:50%;text-align:right;pointer-events:auto;opacity:0">
      <p>Want to see more?</p>
      <a href="/work">Check out our work!</a>
    </div>
  </div>
</section>
<section><p>{tagline}</p></section>"#,
        background = config.sequence.background,
        width = config.canvas.width_fraction * 100.0,
        max = config.canvas.max_width,
        aspect = config.canvas.aspect_ratio,
        tagline = config.site.tagline,
    );
    let script = r#"const config = await fetch("/api/config").then((r) => (r.ok ? r.text() : undefined)).catch(() => undefined);
const player = SequencePlayer.mount(
  document.getElementById("sequence"),
  document.getElementById("sequence-canvas"),
  document.getElementById("overlay"),
  config,
);
const reveal = document.getElementById("reveal");
const layers = [
  ScrollChoreography.mount(reveal, document.getElementById("reveal-video"), "reveal-video", config),
  ScrollChoreography.mount(reveal, document.getElementById("reveal-cta"), "reveal-cta", config),
];
window.addEventListener("pagehide", () => {
  player.unmount();
  layers.forEach((layer) => layer.unmount());
}, { once: true });"#;
    layout(&config.site.name, &body, script)
}

fn work(config: &SiteConfig) -> String {
    let body = r#"<main id="gallery" style="display:grid;grid-template-columns:repeat(6,1fr);grid-auto-rows:10vw;gap:4px"></main>
<div id="lightbox" hidden></div>"#;
    let script = r#"const tiles = await fetch("/api/work").then((r) => r.json());
const gallery = document.getElementById("gallery");
const box = document.getElementById("lightbox");
const lightbox = new Lightbox(tiles.length);
const show = () => {
  const index = lightbox.active();
  box.hidden = index === undefined;
  if (index === undefined) { box.replaceChildren(); return; }
  const tile = tiles[index];
  const media = document.createElement(tile.kind === "video" ? "video" : "img");
  media.src = tile.src;
  if (tile.kind === "video") { media.controls = true; media.autoplay = true; }
  box.replaceChildren(media);
};
tiles.forEach((tile, index) => {
  const cell = document.createElement("button");
  cell.style.gridColumn = `span ${tile.columns}`;
  cell.style.gridRow = `span ${tile.rows}`;
  const img = document.createElement("img");
  img.src = tile.poster ?? tile.src;
  img.alt = tile.title;
  img.loading = tile.priority ? "eager" : "lazy";
  cell.append(img);
  cell.addEventListener("click", () => { lightbox.open(index); show(); });
  gallery.append(cell);
});
box.addEventListener("click", () => { lightbox.close(); show(); });
document.addEventListener("keydown", (e) => {
  if (lightbox.handleKey(e.key)) { e.preventDefault(); show(); }
});"#;
    layout(&format!("Work | {}", config.site.name), body, script)
}

fn contact(config: &SiteConfig) -> String {
    let body = r#"<main>
  <form id="contact-form">
    <input name="name" placeholder="이름">
    <input name="email" type="email" placeholder="이메일" required>
    <input name="phone" placeholder="연락처">
    <textarea name="message" placeholder="메시지" required></textarea>
    <button type="submit">보내기</button>
    <p id="contact-status" role="status"></p>
  </form>
</main>"#;
    let script = r#"const form = document.getElementById("contact-form");
const status = document.getElementById("contact-status");
form.addEventListener("submit", async (e) => {
  e.preventDefault();
  const body = JSON.stringify(Object.fromEntries(new FormData(form)));
  const res = await fetch("/api/contact", { method: "POST", headers: { "content-type": "application/json" }, body });
  const data = await res.json().catch(() => ({}));
  status.textContent = res.ok ? "문의가 접수되었습니다." : data.error ?? "오류가 발생했습니다.";
  if (res.ok) form.reset();
});"#;
    layout(&format!("Contact | {}", config.site.name), body, script)
}

/// `(directory under public/, index.html contents)` for every route.
pub fn starter_pages(config: &SiteConfig) -> Vec<(&'static str, String)> {
    vec![
        ("", home(config)),
        ("work", work(config)),
        ("contact", contact(config)),
    ]
}
