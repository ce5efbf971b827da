use html_escape::{encode_double_quoted_attribute, encode_text};

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; }
    h1 { color: #2e7d32; }
    .box { border: 1px solid #ccc; padding: 20px; border-radius: 5px; }
    .code { font-size: 24px; font-weight: bold; text-align: center; margin: 20px; }
    button { background: #2e7d32; color: white; border: none; padding: 10px 20px;
             border-radius: 5px; cursor: pointer; }
"#;

/// Device verification page. The button posts to `/verify/authorize`.
pub fn render(code: &str) -> String {
    let code_attr = encode_double_quoted_attribute(code);
    let code = encode_text(code);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>Device Verification</title>
  <style>{STYLE}</style>
</head>
<body>
  <h1>Device Verification</h1>
  <div class="box">
    <p>A device is trying to connect to your account.</p>
    <p>Device code:</p>
    <div class="code">{code}</div>
    <p>If you recognise this request, click Authorize.</p>
    <form method="post" action="/verify/authorize">
      <input type="hidden" name="code" value="{code_attr}">
      <button type="submit">Authorize</button>
    </form>
  </div>
</body>
</html>
"#
    )
}

/// Shown after the button was pressed.
pub fn render_authorized(code: &str) -> String {
    let code = encode_text(code);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>Device Authorized</title>
  <style>{STYLE}</style>
</head>
<body>
  <h1>Device Authorized</h1>
  <div class="box">
    <div class="code">{code}</div>
    <p>The next token poll from the CLI will succeed. You can close this page.</p>
  </div>
</body>
</html>
"#
    )
}
