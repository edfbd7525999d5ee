use serde_json::Value;
use shelf_types::{CollectionKind, Deleted, Health, ItemList};

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn field_label(name: &str) -> String {
    if name == "isbn" {
        return "ISBN".to_string();
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn summary(kind: CollectionKind, item: &Value) -> String {
    let id = scalar(&item["id"]);
    match kind {
        CollectionKind::Books => {
            let mut line = format!("ID {id}: {} by {}", scalar(&item["title"]), scalar(&item["author"]));
            if !item["year"].is_null() {
                line.push_str(&format!(" ({})", scalar(&item["year"])));
            }
            line
        }
        CollectionKind::Quotes => format!(
            "ID {id}: \"{}\" - {}",
            scalar(&item["text"]),
            scalar(&item["character"])
        ),
    }
}

pub fn list(kind: CollectionKind, list: &ItemList<Value>) -> String {
    let mut text = format!("Found {} {}:\n\n", list.count, kind);
    for item in &list.items {
        text.push_str(&summary(kind, item));
        text.push('\n');
    }
    text
}

/// Item with a heading, one field per line. Unset optional fields are left out.
pub fn item(kind: CollectionKind, action: Option<&str>, item: &Value) -> String {
    let id = scalar(&item["id"]);
    let mut text = match action {
        Some(action) => format!("{action} {} ID {id}:\n", kind.kind_name().to_lowercase()),
        None => format!("{} ID {id}:\n", kind.kind_name()),
    };
    for field in kind.fields() {
        let value = &item[field.name];
        if value.is_null() {
            continue;
        }
        let value = if field.name == kind.label_field() && kind == CollectionKind::Quotes {
            format!("\"{}\"", scalar(value))
        } else {
            scalar(value)
        };
        text.push_str(&format!("{}: {}\n", field_label(field.name), value));
    }
    text
}

pub fn deleted(kind: CollectionKind, deleted: &Deleted) -> String {
    format!(
        "Successfully deleted {} ID {}\nMessage: {}\n",
        kind.kind_name().to_lowercase(),
        deleted.deleted_id,
        deleted.message
    )
}

pub fn health(health: &Health) -> String {
    format!("API Status: {}\nMessage: {}\n", health.status, health.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_books() {
        let list = ItemList::new(
            vec![
                json!({"id": 1, "title": "Clean Code", "author": "Robert C. Martin", "year": 2008}),
                json!({"id": 4, "title": "Dune", "author": "Herbert", "year": 1965}),
            ],
            "Found 2 books",
        );
        let text = super::list(CollectionKind::Books, &list);
        assert_eq!(
            text,
            "Found 2 books:\n\nID 1: Clean Code by Robert C. Martin (2008)\nID 4: Dune by Herbert (1965)\n"
        );
    }

    #[test]
    fn test_list_quotes() {
        let list = ItemList::new(
            vec![json!({"id": 2, "text": "Good news, everyone!", "character": "Professor Farnsworth"})],
            "",
        );
        let text = super::list(CollectionKind::Quotes, &list);
        assert!(text.starts_with("Found 1 quotes:"));
        assert!(text.contains("ID 2: \"Good news, everyone!\" - Professor Farnsworth"));
    }

    #[test]
    fn test_item_skips_unset_fields() {
        let quote = json!({
            "id": 5,
            "text": "Why not Zoidberg?",
            "character": "Dr. Zoidberg",
            "episode": "Various Episodes",
            "season": null,
            "year": 3001,
            "created_at": "2024-01-01T00:00:00Z"
        });
        let text = item(CollectionKind::Quotes, Some("Created"), &quote);
        assert_eq!(
            text,
            "Created quote ID 5:\nText: \"Why not Zoidberg?\"\nCharacter: Dr. Zoidberg\nEpisode: Various Episodes\nYear: 3001\n"
        );
    }

    #[test]
    fn test_book_item() {
        let book = json!({"id": 3, "title": "Programming Rust", "author": "Jim Blandy", "year": 2021, "isbn": "978-1492052593"});
        let text = item(CollectionKind::Books, None, &book);
        assert!(text.starts_with("Book ID 3:\nTitle: Programming Rust\n"));
        assert!(text.contains("ISBN: 978-1492052593\n"));
        assert!(text.contains("Year: 2021\n"));
    }

    #[test]
    fn test_deleted() {
        let text = deleted(
            CollectionKind::Books,
            &Deleted {
                message: "Successfully deleted book with ID 2".into(),
                deleted_id: 2,
            },
        );
        assert!(text.starts_with("Successfully deleted book ID 2\n"));
    }
}
