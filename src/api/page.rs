//! Embedded single-page dashboard.
//!
//! Self-contained HTML + vanilla JS; Plotly.js comes from its CDN and
//! consumes the figure JSON the chart endpoints emit. Each control
//! change re-fetches only the charts that depend on that control.

use axum::response::Html;

pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Wardview — Patient Encounter Dashboard</title>
  <script src="https://cdn.plot.ly/plotly-2.32.0.min.js"></script>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #fafaf9; color: #1c1917; padding: 24px;
    }
    h1 { font-size: 24px; margin-bottom: 4px; }
    .subtitle { color: #78716c; font-size: 14px; margin-bottom: 24px; }
    .controls {
      display: flex; flex-wrap: wrap; gap: 24px; align-items: flex-end;
      background: white; border: 1px solid #e7e5e4; border-radius: 12px;
      padding: 16px; margin-bottom: 24px;
    }
    .control { display: flex; flex-direction: column; gap: 6px; }
    .control label { font-size: 13px; font-weight: 600; color: #44403c; }
    .control select, .control input[type=file] {
      padding: 8px; border: 1px solid #d6d3d1; border-radius: 8px; font-size: 14px;
    }
    .control input[type=range] { width: 220px; }
    .radio-row { display: flex; gap: 12px; font-size: 14px; padding: 8px 0; }
    .grid {
      display: grid; grid-template-columns: repeat(auto-fit, minmax(440px, 1fr));
      gap: 24px;
    }
    .card {
      background: white; border: 1px solid #e7e5e4; border-radius: 12px;
      padding: 8px; min-height: 420px;
    }
    #upload-status { font-size: 13px; color: #78716c; margin-top: 4px; }
    #upload-status.error { color: #dc2626; }
  </style>
</head>
<body>
  <h1>Wardview</h1>
  <p class="subtitle">Patient-encounter analytics over the bundled healthcare dataset.</p>

  <div class="controls">
    <div class="control">
      <label for="gender">Gender</label>
      <select id="gender"><option value="">All</option></select>
    </div>
    <div class="control">
      <label for="condition">Medical condition (trends)</label>
      <select id="condition"><option value="">All</option></select>
    </div>
    <div class="control">
      <label>Trend chart type</label>
      <div class="radio-row">
        <label><input type="radio" name="kind" value="line" checked> Line</label>
        <label><input type="radio" name="kind" value="bar"> Bar</label>
      </div>
    </div>
    <div class="control">
      <label for="ceiling">Billing ceiling: <span id="ceiling-value"></span></label>
      <input type="range" id="ceiling">
    </div>
    <div class="control">
      <label for="file">Upload a file</label>
      <input type="file" id="file">
      <div id="upload-status">Nothing uploaded yet.</div>
    </div>
  </div>

  <div class="grid">
    <div class="card" id="chart-age"></div>
    <div class="card" id="chart-conditions"></div>
    <div class="card" id="chart-insurance"></div>
    <div class="card" id="chart-billing"></div>
    <div class="card" id="chart-trends"></div>
  </div>

  <script>
    var genderEl = document.getElementById('gender');
    var conditionEl = document.getElementById('condition');
    var ceilingEl = document.getElementById('ceiling');
    var ceilingValueEl = document.getElementById('ceiling-value');
    var fileEl = document.getElementById('file');
    var statusEl = document.getElementById('upload-status');

    function chartKind() {
      return document.querySelector('input[name=kind]:checked').value;
    }

    function drawChart(target, path, params) {
      var query = new URLSearchParams(params).toString();
      fetch('/api/charts/' + path + (query ? '?' + query : ''))
        .then(function (r) { return r.json(); })
        .then(function (fig) {
          Plotly.react(target, fig.data, fig.layout, { responsive: true });
        });
    }

    function refreshGenderCharts() {
      var gender = genderEl.value;
      drawChart('chart-age', 'age-distribution', { gender: gender });
      drawChart('chart-conditions', 'condition-share', { gender: gender });
      drawChart('chart-insurance', 'insurance-billing', { gender: gender });
      refreshBillingChart();
    }

    function refreshBillingChart() {
      ceilingValueEl.textContent = Number(ceilingEl.value).toFixed(0);
      drawChart('chart-billing', 'billing-distribution', {
        gender: genderEl.value,
        ceiling: ceilingEl.value
      });
    }

    function refreshTrendsChart() {
      drawChart('chart-trends', 'admission-trends', {
        condition: conditionEl.value,
        kind: chartKind()
      });
    }

    genderEl.addEventListener('change', refreshGenderCharts);
    ceilingEl.addEventListener('input', refreshBillingChart);
    conditionEl.addEventListener('change', refreshTrendsChart);
    document.querySelectorAll('input[name=kind]').forEach(function (radio) {
      radio.addEventListener('change', refreshTrendsChart);
    });

    fileEl.addEventListener('change', function () {
      var file = fileEl.files[0];
      if (!file) return;
      var reader = new FileReader();
      reader.onload = function () {
        fetch('/api/upload', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ filename: file.name, contents: reader.result })
        })
          .then(function (r) { return r.json().then(function (body) { return { ok: r.ok, body: body }; }); })
          .then(function (result) {
            if (result.ok) {
              statusEl.classList.remove('error');
              statusEl.textContent = result.body.status;
            } else {
              statusEl.classList.add('error');
              statusEl.textContent = result.body.error.message;
            }
          });
      };
      reader.readAsDataURL(file);
    });

    fetch('/api/meta')
      .then(function (r) { return r.json(); })
      .then(function (meta) {
        meta.genders.forEach(function (g) {
          genderEl.add(new Option(g, g));
        });
        meta.conditions.forEach(function (c) {
          conditionEl.add(new Option(c, c));
        });
        ceilingEl.min = meta.billing.min;
        ceilingEl.max = meta.billing.max;
        ceilingEl.step = 'any';
        ceilingEl.value = meta.billing.median;
        refreshGenderCharts();
        refreshTrendsChart();
      });
  </script>
</body>
</html>
"#;
