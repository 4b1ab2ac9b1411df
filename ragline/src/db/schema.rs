use serde_json::{json, Value};

/// Class definition for the chunk collection: server-side transformer
/// vectorization of `content`, with `source` and `ingestedAt` as plain
/// properties.
pub fn collection_schema(class_name: &str) -> Value {
    json!({
        "class": class_name,
        "vectorizer": "text2vec-transformers",
        "moduleConfig": {
            "text2vec-transformers": {
                "vectorizeClassName": false
            }
        },
        "properties": [
            { "name": "content", "dataType": ["text"] },
            { "name": "source", "dataType": ["text"] },
            { "name": "ingestedAt", "dataType": ["date"] }
        ]
    })
}

/// GraphQL `Get` query returning the `limit` nearest objects to `query`.
pub fn near_text_query(class_name: &str, query: &str, limit: usize) -> String {
    // A JSON string literal is also a valid GraphQL string literal.
    let concept = Value::String(query.to_string()).to_string();

    format!(
        "{{ Get {{ {class_name}(nearText: {{ concepts: [{concept}] }}, limit: {limit}) \
         {{ content source _additional {{ distance }} }} }} }}"
    )
}
