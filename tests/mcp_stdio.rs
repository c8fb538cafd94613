use std::path::{Path, PathBuf};

use rmcp::{
    ServiceExt,
    model::CallToolRequestParams,
    service::{RoleClient, RunningService},
    transport::{ConfigureCommandExt, TokioChildProcess},
};
use serde_json::{Value, json};

const SNAPSHOT_FILES: [&str; 5] = [
    "type.json",
    "card.json",
    "set.json",
    "keyword.json",
    "ability.json",
];

fn setup_snapshot(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/english");
    for file in SNAPSHOT_FILES {
        std::fs::copy(bundled.join(file), dir.join(file))?;
    }
    Ok(())
}

async fn spawn(
    configure: impl FnOnce(&mut tokio::process::Command),
) -> Result<RunningService<RoleClient, ()>, Box<dyn std::error::Error>> {
    let bin = rathe_bin()?;
    let transport = TokioChildProcess::new(
        tokio::process::Command::new(bin).configure(|cmd| {
            cmd.arg("mcp").env("RATHE_LOG", "warn");
            configure(cmd);
        }),
    )?;
    Ok(().serve(transport).await?)
}

async fn call(
    client: &RunningService<RoleClient, ()>,
    name: &'static str,
    args: Value,
) -> Result<rmcp::model::CallToolResult, Box<dyn std::error::Error>> {
    let mut params = CallToolRequestParams::new(name);
    params.arguments = args.as_object().cloned();
    Ok(client.peer().call_tool(params).await?)
}

#[tokio::test]
async fn mcp_stdio_card_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::tempdir()?;
    setup_snapshot(tempdir.path())?;

    let data_dir = tempdir.path().to_path_buf();
    let client = spawn(move |cmd| {
        cmd.env("RATHE_DATA_DIR", &data_dir);
    })
    .await?;

    let tools = client.peer().list_all_tools().await?;
    let names: Vec<&str> = tools.iter().map(|t| &*t.name).collect();
    for expected in [
        "search_cards",
        "get_card",
        "list_sets",
        "search_sets",
        "get_set",
        "search_card_text",
        "get_format_legality",
        "list_keywords",
        "get_keyword",
        "list_abilities",
        "catalog_stats",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }

    let result = call(
        &client,
        "search_cards",
        json!({ "class": "Ninja", "format": "blitz", "limit": 3 }),
    )
    .await?;
    let structured = result.structured_content.expect("structured content");
    assert_eq!(structured["count"], 3);
    assert_eq!(structured["total"], 5);

    let result =
        call(&client, "get_card", json!({ "id": "Enlightened Strike" }))
            .await?;
    let structured = result.structured_content.expect("structured content");
    assert_eq!(structured["name"], "Enlightened Strike");
    assert_eq!(structured["sets"], json!(["WTR"]));

    let result = call(&client, "get_card", json!({ "id": "No Such Card" }))
        .await?;
    assert_eq!(result.is_error, Some(true));

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn mcp_stdio_embedded_sets() -> Result<(), Box<dyn std::error::Error>> {
    let empty_home = tempfile::tempdir()?;
    let home = empty_home.path().to_path_buf();
    let client = spawn(move |cmd| {
        cmd.env_remove("RATHE_DATA_DIR").env("XDG_DATA_HOME", &home);
    })
    .await?;

    let result = call(
        &client,
        "get_set",
        json!({ "id": "wtr", "includeCards": true }),
    )
    .await?;
    let structured = result.structured_content.expect("structured content");
    assert_eq!(structured["name"], "Welcome to Rathe");
    assert_eq!(structured["card_count"], 16);

    let result = call(&client, "search_sets", json!({ "q": "rathe" })).await?;
    let structured = result.structured_content.expect("structured content");
    assert_eq!(structured["count"], 1);
    assert_eq!(structured["sets"][0]["id"], "WTR");

    let result = call(&client, "catalog_stats", json!({})).await?;
    let structured = result.structured_content.expect("structured content");
    assert_eq!(structured["data"]["sets"], 8);

    client.cancel().await?;
    Ok(())
}

fn rathe_bin() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(bin) = std::env::var("CARGO_BIN_EXE_rathe") {
        return Ok(PathBuf::from(bin));
    }

    let mut path = std::env::current_exe()?;
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("rathe");

    if cfg!(windows) {
        path.set_extension("exe");
    }

    Ok(path)
}
