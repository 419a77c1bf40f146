//! Server-rendered pages for the form-driven CRUD surface.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::models::user::UserResponse;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem; }
table { border-collapse: collapse; margin-bottom: 1.5rem; }
th, td { border: 1px solid #ccc; padding: 0.3rem 0.8rem; text-align: left; }
form { margin-bottom: 1rem; }
fieldset { display: inline-block; margin-right: 1rem; vertical-align: top; }
label { display: block; margin-bottom: 0.3rem; }
"#;

const SEARCH_SCRIPT: &str = r#"
document.getElementById('search-form').addEventListener('submit', async (event) => {
  event.preventDefault();
  const term = document.getElementById('term').value;
  const response = await fetch('/crud/search/term/', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ term }),
  });
  const body = document.getElementById('results');
  body.replaceChildren();
  if (!response.ok) { return; }
  for (const user of await response.json()) {
    const row = body.insertRow();
    for (const key of ['id', 'name', 'email', 'phone']) {
      row.insertCell().textContent = user[key];
    }
  }
});
"#;

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                nav {
                    a href="/crud/" { "Users" }
                    " | "
                    a href="/crud/search/" { "Search" }
                }
                h1 { (title) }
                (content)
            }
        }
    }
}

fn users_table(users: &[UserResponse]) -> Markup {
    html! {
        table {
            thead {
                tr { th { "ID" } th { "Name" } th { "Email" } th { "Phone" } }
            }
            tbody {
                @if users.is_empty() {
                    tr { td colspan="4" { "No users" } }
                }
                @for user in users {
                    tr {
                        td { (user.id) }
                        td { (user.name) }
                        td { (user.email) }
                        td { (user.phone) }
                    }
                }
            }
        }
    }
}

fn text_field(label: &str, name: &str, kind: &str, required: bool) -> Markup {
    html! {
        label {
            (label) " "
            input type=(kind) name=(name) required[required];
        }
    }
}

/// Users table followed by the create, read, update and delete forms
pub fn crud_page(users: &[UserResponse]) -> Markup {
    layout(
        "Users",
        html! {
            (users_table(users))
            fieldset {
                legend { "Create" }
                form method="post" action="/crud/create/" {
                    (text_field("Name", "name", "text", true))
                    (text_field("Email", "email", "email", true))
                    (text_field("Password", "password", "password", true))
                    (text_field("Phone", "phone", "tel", false))
                    button type="submit" { "Create" }
                }
            }
            fieldset {
                legend { "Read" }
                form method="post" action="/crud/read/" {
                    (text_field("User ID", "userid", "number", true))
                    button type="submit" { "Read" }
                }
            }
            fieldset {
                legend { "Update" }
                form method="post" action="/crud/update/" {
                    (text_field("User ID", "userid", "number", true))
                    (text_field("Name", "name", "text", true))
                    button type="submit" { "Update" }
                }
            }
            fieldset {
                legend { "Delete" }
                form method="post" action="/crud/delete/" {
                    (text_field("User ID", "userid", "number", true))
                    button type="submit" { "Delete" }
                }
            }
        },
    )
}

/// Search box that queries the JSON search endpoint and fills a table in place
pub fn search_page() -> Markup {
    layout(
        "Search users",
        html! {
            form id="search-form" {
                (text_field("Name or email contains", "term", "search", false))
                button type="submit" { "Search" }
            }
            table {
                thead {
                    tr { th { "ID" } th { "Name" } th { "Email" } th { "Phone" } }
                }
                tbody id="results" {}
            }
            script { (PreEscaped(SEARCH_SCRIPT)) }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i32, name: &str) -> UserResponse {
        UserResponse {
            id,
            name: name.to_string(),
            email: format!("user{}@bedrock.org", id),
            phone: "0001112222".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_crud_page_lists_users_and_forms() {
        let page = crud_page(&[user(1, "Wilma"), user(2, "Fred")]).into_string();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<td>Wilma</td>"));
        assert!(page.contains("user2@bedrock.org"));
        for action in ["/crud/create/", "/crud/read/", "/crud/update/", "/crud/delete/"] {
            assert!(page.contains(&format!("action=\"{}\"", action)));
        }
        assert!(!page.contains("No users"));
    }

    #[test]
    fn test_crud_page_empty_table() {
        let page = crud_page(&[]).into_string();
        assert!(page.contains("No users"));
    }

    #[test]
    fn test_user_fields_are_escaped() {
        let page = crud_page(&[user(1, "<script>alert(1)</script>")]).into_string();
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_search_page_posts_json() {
        let page = search_page().into_string();
        assert!(page.contains("/crud/search/term/"));
        assert!(page.contains("id=\"results\""));
    }
}
