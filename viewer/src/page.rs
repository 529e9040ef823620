/// Two-pane browser view served at `/`: clickable route map on the left,
/// spectrogram pane on the right. Talks to `/route`, `/select`, and
/// `/spectrogram` on the same origin.
pub const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Interactive Cable Spectrogram Viewer</title>
<style>
  body { font-family: sans-serif; margin: 1rem; background: #fff; }
  .panes { display: flex; gap: 1rem; align-items: flex-start; }
  #cable-map { border: 1px solid #ccc; cursor: crosshair; }
  .image-pane { text-align: center; }
  #spectrogram { max-height: 70vh; border: 1px solid #ccc; min-width: 200px; }
</style>
</head>
<body>
<h2>Interactive Cable Spectrogram Viewer</h2>
<div class="panes">
  <canvas id="cable-map" width="900" height="520"></canvas>
  <div class="image-pane">
    <h3 id="spec-title">Click a point to view its spectrogram</h3>
    <img id="spectrogram" alt="">
  </div>
</div>
<script>
let route = null;
let selected = null;
const canvas = document.getElementById('cable-map');
const ctx = canvas.getContext('2d');
const MARGIN = 24;

function transform() {
  const minX = Math.min(...route.x), maxX = Math.max(...route.x);
  const minY = Math.min(...route.y), maxY = Math.max(...route.y);
  const spanX = Math.max(maxX - minX, 1e-9);
  const spanY = Math.max(maxY - minY, 1e-9);
  const scale = Math.min(
    (canvas.width - 2 * MARGIN) / spanX,
    (canvas.height - 2 * MARGIN) / spanY
  );
  return function (x, y) {
    return [
      MARGIN + (x - minX) * scale,
      canvas.height / 2 - (y - (minY + maxY) / 2) * scale,
    ];
  };
}

function drawRoute() {
  if (!route) return;
  ctx.clearRect(0, 0, canvas.width, canvas.height);
  const project = transform();
  for (let i = 0; i < route.x.length; i++) {
    const [px, py] = project(route.x[i], route.y[i]);
    ctx.beginPath();
    ctx.arc(px, py, i === selected ? 5 : 2, 0, 2 * Math.PI);
    ctx.fillStyle = i === selected ? '#d62728' : '#000';
    ctx.fill();
  }
}

function nearestPoint(px, py) {
  if (!route) return null;
  const project = transform();
  let best = null, bestDist = Infinity;
  for (let i = 0; i < route.x.length; i++) {
    const [qx, qy] = project(route.x[i], route.y[i]);
    const d = (qx - px) * (qx - px) + (qy - py) * (qy - py);
    if (d < bestDist) { bestDist = d; best = i; }
  }
  return best;
}

canvas.addEventListener('click', async (event) => {
  const rect = canvas.getBoundingClientRect();
  const index = nearestPoint(event.clientX - rect.left, event.clientY - rect.top);
  if (index === null) return;
  const response = await fetch('/select', {
    method: 'POST',
    headers: { 'content-type': 'application/json' },
    body: JSON.stringify({ index: index }),
  });
  if (!response.ok) return;
  const reply = await response.json();
  selected = reply.index;
  document.getElementById('spec-title').textContent = reply.label;
  document.getElementById('spectrogram').src = '/spectrogram?t=' + Date.now();
  drawRoute();
});

canvas.addEventListener('mousemove', (event) => {
  const rect = canvas.getBoundingClientRect();
  const index = nearestPoint(event.clientX - rect.left, event.clientY - rect.top);
  if (index !== null && route.distances_m) {
    canvas.title = 'Channel ' + index + ', ' + route.distances_m[index].toFixed(1) + ' m';
  }
});

(async function boot() {
  const response = await fetch('/route');
  route = await response.json();
  selected = route.selected;
  drawRoute();
})();
</script>
</body>
</html>
"#;
