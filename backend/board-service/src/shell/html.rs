//! Server-rendered page for the current screen.
//!
//! Strings coming from users are escaped, except post bodies which are
//! stored HTML and rendered as-is.

use rich_text::html::{escape_attr, escape_text};
use rich_text::{FormatCommand, Mark, Position};

use super::form::FormMode;
use super::screen::{
    ComposerView, FeedStatus, FeedView, FormView, PostCard, Screen, WorkspaceView,
};
use crate::i18n::{Locale, Text};

const STYLE: &str = "body{font-family:sans-serif;background:#f1f5f9;margin:0}\
main{max-width:48rem;margin:3rem auto;background:#fff;border-radius:1rem;padding:2rem}\
.error{color:#dc2626}.notice{background:#fffbeb;border:2px solid #fde68a;padding:1rem}\
.post{border:1px solid #e2e8f0;border-radius:1.5rem;padding:1.5rem;margin:1rem 0}\
.avatar{display:inline-block;width:2.5rem;height:2.5rem;border-radius:.75rem;\
background:#eef2ff;text-align:center;line-height:2.5rem;font-weight:900}\
.content img{max-width:100%;border-radius:1rem}\
.toolbar form{display:inline}.editor{min-height:6rem;border:1px dashed #cbd5e1;padding:1rem}\
.placeholder{color:#94a3b8}";

// Forms post their fields as JSON to `data-endpoint`; dotted names nest
// and number inputs stay numbers. File inputs upload raw bytes with the
// file's type. Buttons marked `data-busy` are disabled while in flight.
const SCRIPT: &str = r#"
function collect(form) {
  var body = {};
  Array.prototype.forEach.call(form.elements, function (el) {
    if (!el.name) { return; }
    var path = el.name.split('.');
    var target = body;
    for (var i = 0; i < path.length - 1; i++) {
      target = target[path[i]] = target[path[i]] || {};
    }
    target[path[path.length - 1]] = el.type === 'number' ? Number(el.value) : el.value;
  });
  return body;
}
function busy(form) {
  var button = form.querySelector('button[data-busy]');
  if (button) { button.disabled = true; button.textContent = button.dataset.busy; }
}
document.querySelectorAll('form[data-endpoint]').forEach(function (form) {
  form.addEventListener('submit', function (event) {
    event.preventDefault();
    busy(form);
    fetch(form.dataset.endpoint, {
      method: form.dataset.method || 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(collect(form))
    }).then(function () { window.location.reload(); });
  });
});
document.querySelectorAll('input[type=file][data-upload]').forEach(function (input) {
  input.addEventListener('change', function () {
    var file = input.files[0];
    if (!file) { return; }
    fetch(input.dataset.upload, {
      method: 'POST',
      headers: { 'Content-Type': file.type || 'application/octet-stream' },
      body: file
    }).then(function () { window.location.reload(); });
  });
});
if (document.body.dataset.screen === 'authenticated') {
  new EventSource('/api/feed/events').onmessage = function () { window.location.reload(); };
}
"#;

pub fn render_page(screen: &Screen, locale: Locale) -> String {
    let (name, body) = match screen {
        Screen::Loading => ("loading", "<p aria-busy=\"true\">&hellip;</p>".to_string()),
        Screen::Anonymous(form) => ("anonymous", render_form(form, locale)),
        Screen::Authenticated(workspace) => ("authenticated", render_workspace(workspace, locale)),
    };

    format!(
        "<!DOCTYPE html><html lang=\"{lang}\"><head><meta charset=\"utf-8\">\
         <title>Board</title><style>{style}</style></head>\
         <body data-screen=\"{name}\"><main>{body}</main><script>{script}</script></body></html>",
        lang = match locale {
            Locale::En => "en",
            Locale::Ko => "ko",
        },
        style = STYLE,
        name = name,
        body = body,
        script = SCRIPT,
    )
}

fn render_form(form: &FormView, locale: Locale) -> String {
    let t = |text: Text| text.in_locale(locale);
    let (heading, submit, switch) = match form.mode {
        FormMode::SignIn => (Text::SignInHeading, Text::SignInSubmit, Text::SwitchToSignUp),
        FormMode::SignUp => (Text::SignUpHeading, Text::SignUpSubmit, Text::SwitchToSignIn),
    };
    let endpoint = match form.mode {
        FormMode::SignIn => "/api/auth/sign-in",
        FormMode::SignUp => "/api/auth/sign-up",
    };

    let mut out = format!("<h1>{}</h1>", escape_text(t(heading)));
    out.push_str(&format!(
        "<form data-endpoint=\"{}\"><input type=\"email\" name=\"email\" required value=\"{}\">\
         <input type=\"password\" name=\"password\" required>",
        endpoint,
        escape_attr(&form.email)
    ));
    if let Some(error) = &form.error {
        out.push_str(&format!("<p class=\"error\">{}</p>", escape_text(error)));
    }
    out.push_str(&format!(
        "<button type=\"submit\" data-busy=\"{}\">{}</button></form>",
        escape_attr(t(Text::Processing)),
        escape_text(t(submit))
    ));
    out.push_str(&format!(
        "<form data-endpoint=\"/api/auth/federated\"><button type=\"submit\">{} {}</button></form>",
        escape_text(t(Text::FederatedButton)),
        escape_text(&form.federated_provider)
    ));
    out.push_str(&format!(
        "<form data-endpoint=\"/api/auth/mode\"><input type=\"hidden\" name=\"mode\" value=\"{}\">\
         <button type=\"submit\">{}</button></form>",
        match form.mode.toggled() {
            FormMode::SignIn => "sign_in",
            FormMode::SignUp => "sign_up",
        },
        escape_text(t(switch))
    ));
    out
}

fn render_workspace(workspace: &WorkspaceView, locale: Locale) -> String {
    let t = |text: Text| text.in_locale(locale);
    let mut out = format!(
        "<header><span class=\"avatar\">{}</span><h2>{}</h2><p>{}</p>\
         <form data-endpoint=\"/api/auth/sign-out\"><button type=\"submit\">{}</button></form></header>",
        escape_text(&workspace.user.initial.to_string()),
        escape_text(t(Text::WorkspaceHeading)),
        escape_text(workspace.user.email.as_deref().unwrap_or_default()),
        escape_text(t(Text::SignOut)),
    );

    if workspace.feed.status != FeedStatus::Degraded {
        out.push_str(&render_composer(&workspace.composer, locale));
    }

    out.push_str(&render_feed(&workspace.feed, locale));
    out
}

fn toolbar_entry(command: FormatCommand) -> (&'static str, Text, Option<Mark>) {
    match command {
        FormatCommand::Bold => ("B", Text::ToolBold, Some(Mark::Bold)),
        FormatCommand::Italic => ("I", Text::ToolItalic, Some(Mark::Italic)),
        FormatCommand::Underline => ("U", Text::ToolUnderline, Some(Mark::Underline)),
        FormatCommand::StrikeThrough => ("S", Text::ToolStrikethrough, Some(Mark::Strikethrough)),
        FormatCommand::BulletList => ("&bull;", Text::ToolBulletList, None),
        FormatCommand::NumberedList => ("1.", Text::ToolNumberedList, None),
        FormatCommand::Heading => ("H", Text::ToolHeading, None),
    }
}

fn position_inputs(name: &str, at: Position) -> String {
    format!(
        "<input type=\"number\" min=\"0\" name=\"{name}.block\" value=\"{block}\">\
         <input type=\"number\" min=\"0\" name=\"{name}.offset\" value=\"{offset}\">",
        name = name,
        block = at.block,
        offset = at.offset,
    )
}

fn render_composer(composer: &ComposerView, locale: Locale) -> String {
    let t = |text: Text| text.in_locale(locale);
    let mut out = format!(
        "<section class=\"composer\"><form data-endpoint=\"/api/composer/title\">\
         <input name=\"title\" placeholder=\"{}\" value=\"{}\"></form>",
        escape_attr(t(Text::TitlePlaceholder)),
        escape_attr(&composer.title),
    );

    out.push_str("<div class=\"toolbar\" role=\"toolbar\">");
    for command in FormatCommand::ALL {
        let (symbol, label, mark) = toolbar_entry(command);
        let pressed = match mark {
            Some(mark) => format!(" aria-pressed=\"{}\"", composer.active_marks.has(mark)),
            None => String::new(),
        };
        out.push_str(&format!(
            "<form data-endpoint=\"/api/composer/format\">\
             <input type=\"hidden\" name=\"command\" value=\"{}\">\
             <button type=\"submit\" title=\"{}\"{}>{}</button></form>",
            command.as_str(),
            escape_attr(t(label)),
            pressed,
            symbol,
        ));
    }
    out.push_str(&format!(
        "<label>{}<input type=\"file\" accept=\"image/*\" data-upload=\"/api/composer/image\"></label></div>",
        escape_text(t(Text::InsertImage)),
    ));

    if composer.content_html.is_empty() {
        out.push_str(&format!(
            "<div class=\"content editor\"><p class=\"placeholder\">{}</p></div>",
            escape_text(t(Text::ContentPlaceholder)),
        ));
    } else {
        out.push_str(&format!(
            "<div class=\"content editor\">{}</div>",
            composer.content_html
        ));
    }

    out.push_str(&format!(
        "<form data-endpoint=\"/api/composer/text\">\
         <textarea name=\"text\" placeholder=\"{}\"></textarea>\
         <button type=\"submit\">{}</button></form>\
         <form data-endpoint=\"/api/composer/backspace\"><button type=\"submit\">{}</button></form>\
         <form data-endpoint=\"/api/composer/caret\">{}<button type=\"submit\">{}</button></form>\
         <form data-endpoint=\"/api/composer/select\">{}{}<button type=\"submit\">{}</button></form>",
        escape_attr(t(Text::ContentPlaceholder)),
        escape_text(t(Text::AddText)),
        escape_text(t(Text::Backspace)),
        position_inputs("position", composer.selection.focus),
        escape_text(t(Text::MoveCaret)),
        position_inputs("anchor", composer.selection.anchor),
        position_inputs("focus", composer.selection.focus),
        escape_text(t(Text::SelectRange)),
    ));

    if let Some(notice) = &composer.notice {
        out.push_str(&format!("<p class=\"error\">{}</p>", escape_text(notice)));
    }
    out.push_str(&format!(
        "<form data-endpoint=\"/api/composer/submit\">\
         <button type=\"submit\" data-busy=\"{}\">{}</button></form></section>",
        escape_attr(t(Text::Saving)),
        escape_text(t(Text::Publish)),
    ));
    out
}

fn render_feed(feed: &FeedView, locale: Locale) -> String {
    let t = |text: Text| text.in_locale(locale);
    let mut out = format!("<section><h3>{}</h3>", escape_text(t(Text::FeedHeading)));

    if let Some(alert) = &feed.alert {
        out.push_str(&format!("<p class=\"error\" role=\"alert\">{}</p>", escape_text(alert)));
    }

    match feed.status {
        FeedStatus::Degraded => {
            out.push_str(&format!(
                "<div class=\"notice\"><h3>{}</h3><p>{}</p><pre>{}</pre>\
                 <form data-endpoint=\"/api/feed/reload\"><button type=\"submit\">{}</button></form></div>",
                escape_text(t(Text::AccessRulesTitle)),
                escape_text(t(Text::AccessRulesBody)),
                escape_text(feed.rules.as_deref().unwrap_or_default()),
                escape_text(t(Text::ReloadAfterRules)),
            ));
        }
        FeedStatus::Loading => out.push_str("<p aria-busy=\"true\">&hellip;</p>"),
        FeedStatus::Empty => {
            out.push_str(&format!("<p>{}</p>", escape_text(t(Text::FeedEmpty))));
        }
        FeedStatus::Ready => {
            for post in &feed.posts {
                out.push_str(&render_post(post));
            }
        }
    }

    out.push_str("</section>");
    out
}

fn render_post(post: &PostCard) -> String {
    let delete = if post.can_delete {
        format!(
            "<form data-endpoint=\"/api/posts/{}\" data-method=\"DELETE\"><button type=\"submit\">&times;</button></form>",
            post.id
        )
    } else {
        String::new()
    };

    format!(
        "<article class=\"post\" id=\"post-{id}\">{delete}<span class=\"avatar\">{initial}</span>\
         <strong>{author}</strong> <small>{date}</small><h4>{title}</h4>\
         <div class=\"content\">{content}</div></article>",
        id = post.id,
        delete = delete,
        initial = escape_text(&post.author_initial.to_string()),
        author = escape_text(&post.author_name),
        date = escape_text(&post.date_label),
        title = escape_text(&post.title),
        content = post.content_html,
    )
}
