//! Server-rendered pages. Plain HTML forms and `<dialog>` elements, no
//! script needed for any action.

use std::fmt::Write as _;

use shared::{domain::MenuItem, error::ErrorCode};

use crate::messages::page_message;

pub(crate) fn menu_page(items: &[MenuItem], error: Option<ErrorCode>) -> String {
    let mut list = String::new();
    let mut dialogs = String::new();
    for item in items {
        let id = item.id;
        let name = escape_html(&item.name);
        let price = item.display_price();
        let _ = write!(
            list,
            r##"
          <li>
            <span class="menu-item-text">{name} - ${price}</span>
            <div class="menu-buttons">
              <form action="/menu/edit" method="get" style="display: inline">
                <input type="hidden" name="id" value="{id}" />
                <button type="submit">Rediger</button>
              </form>
              <a href="#delete-confirm-{id}" class="delete-btn">Fjern</a>
            </div>
          </li>"##
        );
        let _ = write!(
            dialogs,
            r#"
        <dialog id="delete-confirm-{id}" class="delete-dialog">
          <div class="dialog-content">
            <h3>Bekræft sletning</h3>
            <p>Er du sikker på, at du vil fjerne "{name}"?</p>
            <div class="form-buttons">
              <form action="/menu/delete" method="post" style="display: inline">
                <input type="hidden" name="id" value="{id}" />
                <button type="submit" class="delete-confirm">Ja, fjern</button>
              </form>
              <a href="/edit-menu" class="cancel-btn">Annuller</a>
            </div>
          </div>
        </dialog>"#
        );
    }

    let body = format!(
        r##"<h1>Menu Administration</h1>
      {banner}
      <section id="menu">
        <h2>Menu</h2>
        <ul>{list}
        </ul>
        <div class="add-section">
          <a href="#add-dialog" class="show-add-form-btn">Tilføj ny ret</a>
          <dialog id="add-dialog" class="add-dialog">
            <div class="dialog-content">
              <h3>Tilføj ny ret</h3>
              <form action="/menu" method="post">
                <div class="form-group">
                  <label for="dish">Navn:</label>
                  <input type="text" id="dish" name="dish" required />
                </div>
                <div class="form-group">
                  <label for="price">Pris:</label>
                  <input type="text" id="price" name="price" required />
                </div>
                <div class="form-buttons">
                  <button type="submit">Tilføj ret</button>
                  <a href="/edit-menu" class="cancel-btn">Annuller</a>
                </div>
              </form>
            </div>
          </dialog>
        </div>{dialogs}
      </section>"##,
        banner = error.map(error_banner).unwrap_or_default(),
    );

    // Opens the dialog named by the URL fragment; every action still works
    // without it by following the links.
    let script = r#"
    <script>
      document.addEventListener('DOMContentLoaded', function () {
        const dialog = window.location.hash && document.querySelector(window.location.hash);
        if (dialog && dialog.tagName === 'DIALOG') {
          dialog.showModal();
        }
      });
    </script>"#;

    layout("Menu Handling", &body, script)
}

pub(crate) fn edit_page(item: &MenuItem) -> String {
    let body = format!(
        r#"<h1>Rediger ret</h1>
      <div class="edit-form-section">
        <form action="/menu/edit" method="post">
          <input type="hidden" name="id" value="{id}" />
          <div class="form-group">
            <label for="dish">Navn:</label>
            <input type="text" id="dish" name="dish" value="{name}" required />
          </div>
          <div class="form-group">
            <label for="price">Pris:</label>
            <input type="text" id="price" name="price" value="{price}" required />
          </div>
          <div class="form-buttons">
            <button type="submit">Gem ændringer</button>
            <a href="/edit-menu" class="cancel-link">Annuller</a>
          </div>
        </form>
      </div>"#,
        id = item.id,
        name = escape_html(&item.name),
        price = item.display_price(),
    );
    layout("Rediger ret - Menu Handling", &body, "")
}

fn error_banner(code: ErrorCode) -> String {
    format!(
        r#"<div class="error-banner">
        <span class="error-icon">⚠️</span>
        <span class="error-text">{}</span>
      </div>"#,
        escape_html(page_message(code))
    )
}

fn layout(title: &str, body: &str, script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="da">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{title}</title>
    <link rel="stylesheet" href="/static/style.css" />
    <link rel="icon" href="/static/favicon.ico" type="image/x-icon" />
  </head>
  <body>
    <main>
      {body}
    </main>{script}
  </body>
</html>"#
    )
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
