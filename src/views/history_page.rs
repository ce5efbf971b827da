use chrono::Local;
use html_escape::encode_text;
use std::fmt::Write;

use crate::state::history::HistoryEntry;

const STYLE: &str = r#"
    :root {
      --primary: #2e7d32;
      --secondary: #e8f5e9;
      --gray: #f5f5f5;
      --dark-gray: #333;
      --border: #ddd;
    }
    body {
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
      max-width: 900px;
      margin: 0 auto;
      padding: 20px;
      line-height: 1.6;
      color: var(--dark-gray);
    }
    h1 { color: var(--primary); border-bottom: 2px solid var(--secondary); padding-bottom: 10px; }
    .notification { border: 1px solid var(--border); border-radius: 5px; margin-bottom: 20px; overflow: hidden; }
    .notification-header { background-color: var(--gray); padding: 10px; display: flex; flex-wrap: wrap; gap: 15px; font-size: 14px; }
    .number { font-weight: bold; color: var(--primary); }
    .time { color: #666; }
    .type, .id, .path { background-color: var(--secondary); padding: 2px 8px; border-radius: 4px; }
    .tabs { display: flex; background-color: var(--gray); border-bottom: 1px solid var(--border); }
    .tab-button { background-color: inherit; color: var(--dark-gray); border: none; cursor: pointer; padding: 10px 20px; font-size: 14px; }
    .tab-button.active { background-color: white; border-bottom: 2px solid var(--primary); }
    .tab-content { display: none; padding: 15px; }
    .tab-content.active { display: block; }
    pre { background-color: #f8f8f8; padding: 15px; overflow-x: auto; margin: 0; border-radius: 4px; }
    .auto-refresh { margin: 20px 0; padding: 15px; background-color: var(--gray); border-radius: 5px; display: flex; align-items: center; gap: 10px; }
    button { background-color: var(--primary); color: white; border: none; padding: 6px 12px; border-radius: 4px; cursor: pointer; }
    .refresh-note { color: #777; font-size: 14px; margin-top: 30px; font-style: italic; }
    .empty { padding: 20px; text-align: center; color: #666; font-style: italic; }
"#;

const SCRIPT: &str = r#"
    function openTab(evt, tabName) {
      const card = evt.currentTarget.closest(".notification");
      for (const content of card.getElementsByClassName("tab-content")) {
        content.classList.toggle("active", content.id === tabName);
      }
      for (const button of card.getElementsByClassName("tab-button")) {
        button.classList.toggle("active", button === evt.currentTarget);
      }
    }

    let refreshIntervalId;

    function startAutoRefresh() {
      stopAutoRefresh();
      const seconds = document.getElementById("refreshInterval").value;
      document.getElementById("autoRefreshStatus").textContent = "Active (" + seconds + "s)";
      refreshIntervalId = setInterval(() => location.reload(), seconds * 1000);
    }

    function stopAutoRefresh() {
      if (refreshIntervalId) {
        clearInterval(refreshIntervalId);
        refreshIntervalId = undefined;
      }
      document.getElementById("autoRefreshStatus").textContent = "Off";
    }
"#;

/// Receiver landing page listing `entries` in the given (newest first) order.
pub fn render(entries: &[HistoryEntry]) -> String {
    let list = if entries.is_empty() {
        r#"<p class="empty">No notifications received yet.</p>"#.to_string()
    } else {
        entries
            .iter()
            .enumerate()
            .fold(String::new(), |mut out, (index, entry)| {
                render_entry(&mut out, index, entry);
                out
            })
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Notification Receiver</title>
  <style>{STYLE}</style>
</head>
<body>
  <h1>Notification Receiver</h1>
  <p>This server receives notifications forwarded by the payment CLI.</p>
  <p>Notifications received: <span class="counter">{count}</span></p>

  <div class="auto-refresh">
    <label for="refreshInterval">Auto refresh:</label>
    <select id="refreshInterval">
      <option value="5">5 seconds</option>
      <option value="10" selected>10 seconds</option>
      <option value="30">30 seconds</option>
      <option value="60">1 minute</option>
    </select>
    <button onclick="startAutoRefresh()">Start</button>
    <button onclick="stopAutoRefresh()">Stop</button>
    <button onclick="location.reload()">Refresh now</button>
    <span id="autoRefreshStatus">Off</span>
  </div>

  <h2>Notification History</h2>
  <div id="notifications-list">
{list}
  </div>

  <p class="refresh-note">Reload the page to see new notifications.</p>
  <script>{SCRIPT}</script>
</body>
</html>
"#,
        count = entries.len(),
    )
}

fn render_entry(out: &mut String, index: usize, entry: &HistoryEntry) {
    let time = entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
    let kind = encode_text(entry.kind().unwrap_or("unknown"));
    let id = encode_text(entry.id().unwrap_or("no id"));
    let path = encode_text(&entry.path);
    let body = pretty(&entry.body);
    let payload = encode_text(&body);
    let header_text = pretty(&entry.headers);
    let headers = encode_text(&header_text);

    // Writing into a String cannot fail.
    let _ = write!(
        out,
        r#"    <div class="notification">
      <div class="notification-header">
        <span class="number">#{number}</span>
        <span class="time">{time}</span>
        <span class="type">Type: {kind}</span>
        <span class="id">ID: {id}</span>
        <span class="path">Path: {path}</span>
      </div>
      <div class="tabs">
        <button class="tab-button active" onclick="openTab(event, 'payload-{index}')">Payload</button>
        <button class="tab-button" onclick="openTab(event, 'headers-{index}')">Headers</button>
      </div>
      <div id="payload-{index}" class="tab-content active"><pre>{payload}</pre></div>
      <div id="headers-{index}" class="tab-content"><pre>{headers}</pre></div>
    </div>
"#,
        number = index + 1,
    );
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
