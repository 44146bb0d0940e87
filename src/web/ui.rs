// The interactive front end: a single static page that posts uploads back
// to this server. Widget layout lives entirely in the page; the server
// side of the UI is the /ui/enhance handler.

use axum::response::Html;

// --- GET /ui ---
pub async fn ui_page() -> Html<&'static str> {
    Html(UI_PAGE)
}

const UI_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Photo Enhancer</title>
<style>
  body { font-family: sans-serif; margin: 0; display: flex; }
  #sidebar { width: 240px; padding: 1rem; background: #f4f4f4; min-height: 100vh; }
  #sidebar label { display: block; margin-top: 1rem; font-weight: bold; }
  #main { flex: 1; padding: 1rem; }
  #results { display: flex; gap: 2rem; }
  #error { color: #b00020; margin-top: 1rem; white-space: pre-wrap; }
  img { display: block; margin-top: 0.5rem; }
</style>
</head>
<body>
<div id="sidebar">
  <h3>App Settings</h3>
  <label for="method">Enhancement Method</label>
  <select id="method">
    <option value="gfpgan" selected>gfpgan</option>
    <option value="RestoreFormer">RestoreFormer</option>
    <option value="codeformer">codeformer</option>
  </select>
  <label for="background">Background Enhancement</label>
  <input type="checkbox" id="background" checked>
  <label for="upscale">Upscale Factor</label>
  <select id="upscale">
    <option value="2" selected>2</option>
    <option value="4">4</option>
  </select>
  <label for="width">Display Width: <span id="widthValue">400</span>px</label>
  <input type="range" id="width" min="100" max="800" value="400">
</div>
<div id="main">
  <h2>Photo Enhancer</h2>
  <input type="file" id="file" accept=".png,.jpg,.jpeg">
  <div id="error"></div>
  <div id="results">
    <div><h4>Original Image</h4><img id="original"></div>
    <div><h4>Enhanced Image</h4><img id="enhanced"></div>
  </div>
</div>
<script>
const el = id => document.getElementById(id);
el('width').addEventListener('input', () => {
  el('widthValue').textContent = el('width').value;
  applyWidth();
});
function applyWidth() {
  for (const id of ['original', 'enhanced']) el(id).style.width = el('width').value + 'px';
}
el('file').addEventListener('change', async () => {
  const file = el('file').files[0];
  if (!file) return;
  el('error').textContent = '';
  el('enhanced').removeAttribute('src');
  el('original').src = URL.createObjectURL(file);
  applyWidth();
  const params = new URLSearchParams({
    method: el('method').value,
    background_enhancement: el('background').checked,
    upscale: el('upscale').value,
  });
  const form = new FormData();
  form.append('file', file);
  try {
    const response = await fetch('/ui/enhance?' + params, { method: 'POST', body: form });
    if (!response.ok) {
      const detail = await response.json();
      el('error').textContent = detail.error ? detail.error.message : response.statusText;
      return;
    }
    el('enhanced').src = URL.createObjectURL(await response.blob());
    applyWidth();
  } catch (e) {
    el('error').textContent = 'Request failed: ' + e;
  }
});
</script>
</body>
</html>
"#;
