//! Canned server documents and helpers shared by the integration tests.
#![allow(dead_code)]

use config_hub_client::{ClientOptions, ConfigClient};
use httptest::Server;
use serde_json::{json, Value};

/// Client token used by every scenario.
pub const TOKEN: &str = "abcdefg-glahfkwehjf823498";
/// Context string used by every scenario.
pub const CONTEXT: &str = "test;customer;instance";

/// Pretty-printed JSON file body served both embedded and standalone.
pub const EXAMPLE_FILE: &str =
    "{\n    \"thisisjson\": \"hello\",\n    \"nested\": {\n        \"objects\": \"areok\"\n    }\n}";

/// Pull document exercising every type tag plus an intentionally empty key.
pub fn properties_document() -> Value {
    json!({
        "generatedOn": "08/29/2017 00:20:23",
        "account": "MyAcct",
        "repo": "MyApp",
        "context": "test;tenant;dev-1",
        "files": {},
        "properties": {
            "salesforce.web_host": {"val": "http://scheduling.example.com"},
            "thiskeyisnil": {},
            "aboolean": {"val": "false", "type": "Boolean"},
            "atrueboolean": {"val": "true", "type": "Boolean"},
            "afloat": {"val": "2", "type": "Float"},
            "along": {"val": "2", "type": "Long"},
            "ainteger": {"val": "2", "type": "Integer"},
            "adouble": {"val": "2", "type": "Double"},
            "ajson": {"val": "{\"key\": \"value\"}", "type": "JSON"},
            "acustom": {"val": "s3cr3t", "type": "Password"}
        }
    })
}

/// Pull document carrying an embedded file.
pub fn files_document() -> Value {
    json!({
        "generatedOn": "08/29/2017 00:20:23",
        "account": "MyAcct",
        "repo": "MyApp",
        "context": "test;tenant;dev-1",
        "files": {
            "example.file": {"content": EXAMPLE_FILE, "content-type": "text/plain"}
        },
        "properties": {}
    })
}

/// Pull document for servers configured to omit file bodies.
pub fn no_files_document() -> Value {
    json!({
        "generatedOn": "08/29/2017 00:20:23",
        "account": "MyAcct",
        "repo": "MyApp",
        "context": "test;tenant;dev-1",
        "properties": {}
    })
}

/// Builds a client pointed at the test server with default options.
pub fn client_for(server: &Server) -> ConfigClient {
    client_with_options(server, ClientOptions::default())
}

/// Builds a client pointed at the test server with the supplied options.
pub fn client_with_options(server: &Server, options: ClientOptions) -> ConfigClient {
    ConfigClient::new(server.url_str(""), TOKEN, CONTEXT, options).expect("client builds")
}
