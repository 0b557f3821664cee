//! Interactive capture session.
//!
//! Drives the per-command loop: prompt for a name, run one capture against
//! the external utility, push the text through the parse → average
//! pipeline, and accumulate signatures into the command table. Commands
//! only land in the table after their pipeline succeeds; a failed capture
//! offers a retry instead of aborting the whole run.

use crate::capture::CaptureSession;
use crate::config::AppConfig;
use crate::db::{CommandStore, DeviceId};
use crate::lircd::{self, CommandTable};
use crate::signal::{average_samples, parse_capture};
use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use tracing::info;

/// Run one full capture session from prompt loop to writers.
pub fn run(config: &AppConfig) -> Result<()> {
    let mode2_argv = config.mode2_argv()?;
    let mut table = initial_table(config)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let Some(command) = prompt_command(&mut input, &table)? else {
            break;
        };

        loop {
            println!("Press '{command}' on the remote.");
            println!("  Press the key several times (3+) in slow succession, then press Ctrl-C.");
            match capture_command(config, &mode2_argv, &command) {
                Ok(signature) => {
                    info!(command = %command, length = signature.len(), "captured command");
                    table.insert(command, signature);
                    println!("Done.\n");
                    break;
                }
                Err(err) => {
                    eprintln!("  Capture failed: {err:#}");
                    if !prompt_retry(&mut input, &command)? {
                        break;
                    }
                }
            }
        }
    }

    println!("Creating lircd config file...");
    lircd::write_config(&config.config_file, &config.remote, &table)?;
    println!(
        "lircd config with {} command(s) saved to {}",
        table.len(),
        config.config_file.display()
    );

    if let Some(db_path) = &config.database {
        let device = DeviceId::from_remote(&config.remote)?;
        let mut store = CommandStore::open(db_path)?;
        store.insert_commands(&device, table.names())?;
    }

    Ok(())
}

/// Seed the table from an existing config unless --overwrite discards it.
fn initial_table(config: &AppConfig) -> Result<CommandTable> {
    if !config.config_file.exists() {
        return Ok(CommandTable::new());
    }
    if config.overwrite {
        fs::remove_file(&config.config_file).with_context(|| {
            format!(
                "failed to remove config file '{}'",
                config.config_file.display()
            )
        })?;
        return Ok(CommandTable::new());
    }
    let table = lircd::load_config(&config.config_file)?;
    if !table.is_empty() {
        println!(
            "Loaded {} existing command(s) from {}",
            table.len(),
            config.config_file.display()
        );
    }
    Ok(table)
}

/// Run one capture and reduce it to a signature vector.
fn capture_command(config: &AppConfig, mode2_argv: &[String], command: &str) -> Result<Vec<u32>> {
    let session = CaptureSession::spawn(mode2_argv, &config.lirc_device)?;
    let result = session.run(config.capture_timeout())?;

    if let Some(base) = &config.output_raw {
        let path = format!("{}.{command}", base.display());
        fs::write(&path, &result.raw)
            .with_context(|| format!("failed to save raw capture to '{path}'"))?;
    }

    if result.raw.trim().is_empty() {
        bail!(
            "capture utility produced no output ({}); check the receiver and device path",
            result.stop.label()
        );
    }

    print!("\nProcessing codes... ");
    io::stdout().flush().ok();
    let samples = parse_capture(&result.raw)?;
    let signature = average_samples(&samples)?;
    println!("Done.");
    Ok(signature)
}

/// Ask for the next command name. `None` ends the session.
fn prompt_command(input: &mut impl BufRead, table: &CommandTable) -> Result<Option<String>> {
    loop {
        print!("Enter command name (or press Enter to finish): ");
        io::stdout().flush().ok();
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let command = if trimmed.contains(' ') {
            let renamed = trimmed.replace(' ', "-");
            println!("  Command '{trimmed}' contains spaces; it will be saved as '{renamed}'.");
            renamed
        } else {
            trimmed.to_string()
        };

        if table.contains(&command) {
            println!("  Command '{command}' already exists. Try again.");
            continue;
        }
        return Ok(Some(command));
    }
}

/// Ask whether a failed command should be captured again (default yes).
fn prompt_retry(input: &mut impl BufRead, command: &str) -> Result<bool> {
    print!("  Retry capturing '{command}'? [Y/n] ");
    io::stdout().flush().ok();
    let Some(line) = read_line(input)? else {
        return Ok(false);
    };
    let answer = line.trim().to_ascii_lowercase();
    Ok(!matches!(answer.as_str(), "n" | "no"))
}

/// One line from the operator, `None` on end of input.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::{prompt_command, prompt_retry};
    use crate::lircd::CommandTable;
    use std::io::Cursor;

    #[test]
    fn empty_line_ends_the_session() {
        let mut input = Cursor::new("\n");
        let table = CommandTable::new();
        assert_eq!(prompt_command(&mut input, &table).unwrap(), None);
    }

    #[test]
    fn end_of_input_ends_the_session() {
        let mut input = Cursor::new("");
        let table = CommandTable::new();
        assert_eq!(prompt_command(&mut input, &table).unwrap(), None);
    }

    #[test]
    fn spaces_are_replaced_with_dashes() {
        let mut input = Cursor::new("volume up\n");
        let table = CommandTable::new();
        assert_eq!(
            prompt_command(&mut input, &table).unwrap(),
            Some("volume-up".to_string())
        );
    }

    #[test]
    fn duplicate_names_are_re_prompted() {
        let mut table = CommandTable::new();
        table.insert("power".into(), vec![1, 2]);
        let mut input = Cursor::new("power\nstandby\n");
        assert_eq!(
            prompt_command(&mut input, &table).unwrap(),
            Some("standby".to_string())
        );
    }

    #[test]
    fn renamed_duplicate_is_also_rejected() {
        let mut table = CommandTable::new();
        table.insert("volume-up".into(), vec![1, 2]);
        let mut input = Cursor::new("volume up\nmute\n");
        assert_eq!(
            prompt_command(&mut input, &table).unwrap(),
            Some("mute".to_string())
        );
    }

    #[test]
    fn retry_defaults_to_yes() {
        let mut input = Cursor::new("\n");
        assert!(prompt_retry(&mut input, "power").unwrap());
        let mut input = Cursor::new("y\n");
        assert!(prompt_retry(&mut input, "power").unwrap());
    }

    #[test]
    fn retry_declined_with_n() {
        let mut input = Cursor::new("n\n");
        assert!(!prompt_retry(&mut input, "power").unwrap());
        let mut input = Cursor::new("");
        assert!(!prompt_retry(&mut input, "power").unwrap());
    }
}
