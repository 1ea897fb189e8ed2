//! Remote-control command handlers: keys, key, type.

use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use rokuly_core::{Device, Key};

use crate::cli::{GlobalOpts, KeyArgs, KeyCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize, Tabled)]
struct KeyRow {
    #[tabled(rename = "Key")]
    name: String,
}

/// List the named keys. Needs no device.
pub fn list(global: &GlobalOpts) {
    let keys: Vec<KeyRow> = Key::iter()
        .map(|k| KeyRow {
            name: k.to_string(),
        })
        .collect();
    let out = output::render_list(
        &global.output,
        &keys,
        |k| KeyRow {
            name: k.name.clone(),
        },
        |k| k.name.clone(),
    );
    output::print_output(&out, global.quiet);
}

pub async fn handle(args: KeyArgs, device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        KeyCommand::Press { keys } => {
            let keys = keys
                .iter()
                .map(|k| util::resolve_key(k))
                .collect::<Result<Vec<_>, _>>()?;
            if !device.key_sequence(&keys).await {
                return Err(CliError::OperationFailed {
                    operation: "key sequence".into(),
                    hint: "The device refused a key; later keys were not sent. Run with -v for details."
                        .into(),
                });
            }
            output::success(global, &format!("pressed {}", keys.join(" ")));
            Ok(())
        }
        KeyCommand::Down { key } => {
            let key = util::resolve_key(&key)?;
            device.key_down(&key).await?;
            output::success(global, &format!("holding {key}"));
            Ok(())
        }
        KeyCommand::Up { key } => {
            let key = util::resolve_key(&key)?;
            device.key_up(&key).await?;
            output::success(global, &format!("released {key}"));
            Ok(())
        }
    }
}

/// Type text on the on-screen keyboard.
pub async fn type_text(
    text: &str,
    enter: bool,
    device: &Device,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !device.keyboard_input(text).await {
        return Err(CliError::OperationFailed {
            operation: "keyboard input".into(),
            hint: "Make sure a text field has focus. Run with -v for details.".into(),
        });
    }
    if enter {
        device.key_press(Key::Enter.as_ref()).await?;
    }
    output::success(global, &format!("typed {} characters", text.chars().count()));
    Ok(())
}
