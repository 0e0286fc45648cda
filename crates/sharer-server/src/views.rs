//! HTML templates.
//!
//! Full pages share [`layout`]; fragments (`success`, `category_edit_modal`)
//! are swapped into an existing page by htmx. Everything user-supplied is
//! escaped by maud.

use axum::response::Html;
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use sharer_core::{
  category::{Category, DROPDOWN_PLACEHOLDER},
  page::PageSummary,
  pagination::Paginated,
};

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.12";

/// Inline CSS for every page.
pub const PAGE_CSS: &str = r#"
*{box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;margin:0;background:#fafafa;color:#1a1a2e;line-height:1.5}
nav{display:flex;gap:1.25rem;padding:1rem 1.5rem;background:#fff;border-bottom:1px solid #e5e5ef}
nav a{color:#4f46e5;text-decoration:none;font-weight:600}
main{max-width:860px;margin:0 auto;padding:1.5rem}
textarea{width:100%;min-height:240px;font-family:ui-monospace,Menlo,monospace}
table{width:100%;border-collapse:collapse}
th,td{text-align:left;padding:.5rem;border-bottom:1px solid #e5e5ef}
.banner{padding:.75rem 1rem;background:#ecfdf5;border:1px solid #10b981;border-radius:6px;margin-bottom:1rem}
.pager{display:flex;gap:1rem;align-items:center;margin-top:1rem}
.muted{color:#888}
dialog{border:none;border-radius:8px;padding:1.5rem;min-width:360px}
"#;

/// Wrap a rendered template for axum.
pub fn render(markup: Markup) -> Html<String> { Html(markup.into_string()) }

fn date(ts: &DateTime<Utc>) -> String { ts.format("%Y-%m-%d %H:%M").to_string() }

// ─── Layout ──────────────────────────────────────────────────────────────────

pub fn layout(title: &str, content: Markup) -> Markup {
  html! {
    (DOCTYPE)
    html lang="en" {
      head {
        meta charset="utf-8";
        meta name="viewport" content="width=device-width, initial-scale=1";
        title { (title) " | HTML Sharer" }
        script src=(HTMX_SRC) {}
        style { (PreEscaped(PAGE_CSS)) }
      }
      body {
        nav {
          a href="/" { "Share" }
          a href="/pages" { "Pages" }
          a href="/categories" { "Categories" }
        }
        main { (content) }
      }
    }
  }
}

// ─── Home ────────────────────────────────────────────────────────────────────

/// The submission form. `success_url` shows the banner after a redirect.
pub fn home(success_url: Option<&str>) -> Markup {
  layout("Share HTML", html! {
    h1 { "Share an HTML page" }
    @if let Some(url) = success_url {
      div class="banner" {
        "Your page is live at "
        a href=(url) { (url) }
      }
    }
    form method="post" action="/" enctype="multipart/form-data"
      hx-post="/" hx-target="#result" hx-encoding="multipart/form-data" {
      p {
        label for="htmlContent" { "Paste HTML" }
        textarea id="htmlContent" name="htmlContent" {}
      }
      p {
        label for="htmlFile" { "or upload a file " }
        input type="file" id="htmlFile" name="htmlFile" accept=".html,.htm";
      }
      p {
        label for="category_id" { "Category " }
        select id="category_id" name="category_id"
          hx-get="/categories/options" hx-trigger="load" {
          option value="" { (DROPDOWN_PLACEHOLDER) }
        }
      }
      button type="submit" { "Share" }
    }
    div id="result" {}
  })
}

/// Fragment returned to htmx after a successful share.
pub fn success(url: &str) -> Markup {
  html! {
    div class="banner" {
      p { "Your HTML page has been shared." }
      a href=(url) target="_blank" { (url) }
      " "
      button type="button" onclick={"navigator.clipboard.writeText('" (url) "')"} { "Copy" }
    }
  }
}

// ─── Pages ───────────────────────────────────────────────────────────────────

/// The paginated page listing, optionally filtered to one category.
pub fn pages_index(pages: &Paginated<PageSummary>, category: Option<i64>) -> Markup {
  let filter = category.map(|id| format!("&category={id}")).unwrap_or_default();

  layout("Shared pages", html! {
    h1 { "Shared pages" }
    p class="muted" { (pages.total) " page(s)" }
    @if pages.items.is_empty() {
      p { "Nothing has been shared yet." }
    } @else {
      table {
        thead { tr { th { "Title" } th { "Category" } th { "Created" } } }
        tbody {
          @for page in &pages.items {
            tr {
              td { a href={"/shared/" (page.slug)} { (page.title) } }
              td {
                @if let (Some(id), Some(name)) = (page.category_id, &page.category_name) {
                  a href={"/pages?category=" (id)} { (name) }
                } @else {
                  span class="muted" { "None" }
                }
              }
              td { (date(&page.created_at)) }
            }
          }
        }
      }
    }
    (pager("/pages", pages, &filter))
  })
}

fn pager<T>(path: &str, window: &Paginated<T>, extra: &str) -> Markup {
  html! {
    @if window.total_pages > 1 {
      div class="pager" {
        @if window.has_prev {
          a href={(path) "?page=" (window.page - 1) "&page_size=" (window.page_size) (extra)} { "Previous" }
        }
        span { "Page " (window.page) " of " (window.total_pages) }
        @if window.has_next {
          a href={(path) "?page=" (window.page + 1) "&page_size=" (window.page_size) (extra)} { "Next" }
        }
      }
    }
  }
}

// ─── Categories ──────────────────────────────────────────────────────────────

pub fn categories_index(categories: &Paginated<Category>) -> Markup {
  layout("Categories", html! {
    h1 { "Categories" }
    button type="button"
      onclick="document.getElementById('create_category_modal').showModal()" {
      "New category"
    }
    @if categories.items.is_empty() {
      p { "No categories yet." }
    } @else {
      table {
        thead { tr { th { "Name" } th { "Description" } th { "Created" } th {} } }
        tbody {
          @for cat in &categories.items {
            tr id={"category-" (cat.id)} {
              td { a href={"/pages?category=" (cat.id)} { (cat.name) } }
              td { (cat.description) }
              td { (date(&cat.created_at)) }
              td {
                button type="button"
                  hx-get={"/categories/" (cat.id) "/edit-modal"}
                  hx-target="#edit_category_body"
                  onclick="document.getElementById('edit_category_modal').showModal()" {
                  "Edit"
                }
                " "
                button type="button"
                  hx-delete={"/categories/" (cat.id)}
                  hx-target={"#category-" (cat.id)}
                  hx-swap="outerHTML"
                  hx-confirm="Delete this category? Its pages will become uncategorised." {
                  "Delete"
                }
              }
            }
          }
        }
      }
    }
    (pager("/categories", categories, ""))

    dialog id="create_category_modal" {
      h2 { "New category" }
      (category_fields("/categories", None, None))
    }
    dialog id="edit_category_modal" {
      div id="edit_category_body" {}
    }
  })
}

fn category_fields(action: &str, name: Option<&str>, description: Option<&str>) -> Markup {
  html! {
    form method="post" action=(action) hx-post=(action) hx-swap="none" {
      p {
        label for="name" { "Name " }
        input type="text" id="name" name="name" required value=[name];
      }
      p {
        label for="description" { "Description " }
        textarea id="description" name="description" { (description.unwrap_or_default()) }
      }
      button type="submit" { "Save" }
    }
  }
}

/// Stand-alone create form page.
pub fn category_create_page() -> Markup {
  layout("New category", html! {
    h1 { "New category" }
    (category_fields("/categories", None, None))
  })
}

/// Stand-alone edit form page.
pub fn category_edit_page(category: &Category) -> Markup {
  layout("Edit category", html! {
    h1 { "Edit " (category.name) }
    (category_fields(
      &format!("/categories/{}", category.id),
      Some(&category.name),
      Some(&category.description),
    ))
  })
}

/// Edit form fragment loaded into the edit dialog.
pub fn category_edit_modal(category: &Category) -> Markup {
  html! {
    h2 { "Edit category" }
    (category_fields(
      &format!("/categories/{}", category.id),
      Some(&category.name),
      Some(&category.description),
    ))
  }
}

/// Script returned to htmx after a modal form succeeds.
pub fn close_modal_script(modal_id: &str) -> String {
  format!(
    "<script>document.getElementById('{modal_id}').close(); window.location.reload();</script>"
  )
}

// ─── Errors ──────────────────────────────────────────────────────────────────

pub fn not_found() -> Markup {
  layout("Not found", html! {
    h1 { "404: page not found" }
    p { "The shared page you are looking for does not exist or has been removed." }
    a href="/" { "Share a new page" }
  })
}
