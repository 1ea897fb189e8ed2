//! UI tree command handlers, bound through `RokuUiDriver`.

use std::sync::Arc;

use tabled::Tabled;

use rokuly_core::{Bounds, Device, DeviceUiDriver, RokuUiDriver, UiNode, WaitOptions};

use crate::cli::{GlobalOpts, OutputFormat, UiArgs, UiCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ElementRow {
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Bounds")]
    bounds: String,
    #[tabled(rename = "Displayed")]
    displayed: String,
    #[tabled(rename = "Text")]
    text: String,
}

fn element_row(n: &UiNode) -> ElementRow {
    ElementRow {
        tag: n.tag.clone(),
        name: n.attribute("name").unwrap_or("-").to_owned(),
        bounds: Bounds::of(n).map_or_else(
            || "-".into(),
            |b| format!("{}, {} {}x{}", b.x, b.y, b.width, b.height),
        ),
        displayed: rokuly_core::ui::is_displayed(n).to_string(),
        text: n.label().unwrap_or_default().to_owned(),
    }
}

fn element_id(n: &UiNode) -> String {
    n.attribute("name").unwrap_or(&n.tag).to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: UiArgs,
    device: &Arc<Device>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let driver = RokuUiDriver::new(Arc::clone(device));

    match args.command {
        UiCommand::Dump { save } => {
            let snapshot = device.open_ui_snapshot().await?;
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => snapshot.xml().trim_end().to_owned(),
                _ => output::render_single(&global.output, snapshot.tree(), |_| String::new(), |_| {
                    String::new()
                }),
            };
            output::print_output(&out, global.quiet);
            if let Some(path) = save {
                snapshot.persist(&path)?;
                output::success(global, &format!("saved ui tree to {}", path.display()));
            }
        }
        UiCommand::Find { selector, all } => {
            let selector = util::parse_selector(&selector)?;
            let nodes = if all {
                driver.find_elements(&selector).await?
            } else {
                driver.require_element(&selector).await.map(|n| vec![n])?
            };
            let out = output::render_list(&global.output, &nodes, element_row, element_id);
            output::print_output(&out, global.quiet);
        }
        UiCommand::Text { selector } => {
            let selector = util::parse_selector(&selector)?;
            let text = driver.get_text(&selector).await?.unwrap_or_default();
            output::print_output(&text, global.quiet);
        }
        UiCommand::Attr { selector, name } => {
            let parsed = util::parse_selector(&selector)?;
            let Some(value) = driver.get_attribute(&parsed, &name).await? else {
                return Err(CliError::OperationFailed {
                    operation: format!("read of attribute '{name}'"),
                    hint: format!(
                        "'{selector}' matched an element without that attribute.\n\
                         Run: rokuly ui find '{selector}' -o json"
                    ),
                });
            };
            output::print_output(&value, global.quiet);
        }
        UiCommand::Displayed { selector, viewport } => {
            let selector = util::parse_selector(&selector)?;
            let displayed = if viewport {
                driver.is_displayed_in_viewport(&selector).await?
            } else {
                driver.is_displayed(&selector).await?
            };
            output::print_output(&displayed.to_string(), global.quiet);
        }
        UiCommand::Wait {
            selector,
            gone,
            exist,
            max_wait,
            interval,
        } => {
            let selector = util::parse_selector(&selector)?;
            let options = WaitOptions {
                timeout: max_wait,
                interval,
            };
            let pb = output::spinner(global, format!("waiting for {selector}"));
            let waited = if exist {
                driver.wait_for_exist(&selector, options, gone).await
            } else {
                driver.wait_for_displayed(&selector, options, gone).await
            };
            pb.finish_and_clear();
            waited?;
            output::success(global, &format!("{selector} is {}", state_word(exist, gone)));
        }
    }
    Ok(())
}

fn state_word(exist: bool, gone: bool) -> &'static str {
    match (exist, gone) {
        (true, false) => "present",
        (true, true) => "gone",
        (false, false) => "displayed",
        (false, true) => "no longer displayed",
    }
}
