use anyhow::{Context, bail};
use clap::ValueEnum;
use n64adv_controller::command::Command;

fn strip_hex_prefix(value: &str) -> &str {
    if value.to_ascii_lowercase().starts_with("0x") {
        &value[2..]
    } else {
        value
    }
}

pub(crate) fn u8_from_hex(value: &str) -> Result<u8, std::num::ParseIntError> {
    u8::from_str_radix(strip_hex_prefix(value), 16)
}

pub(crate) fn u32_from_hex(value: &str) -> Result<u32, std::num::ParseIntError> {
    u32::from_str_radix(strip_hex_prefix(value), 16)
}

/// Controller commands as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum CommandName {
    OpenMenu,
    CloseMenu,
    Mute,
    Unmute,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Back,
    DeblurOn,
    DeblurOff,
    #[value(name = "mode15bit-on")]
    Mode15bitOn,
    #[value(name = "mode15bit-off")]
    Mode15bitOff,
}

impl From<CommandName> for Command {
    fn from(value: CommandName) -> Self {
        match value {
            CommandName::OpenMenu => Command::OpenMenu,
            CommandName::CloseMenu => Command::CloseMenu,
            CommandName::Mute => Command::MuteMenu,
            CommandName::Unmute => Command::UnmuteMenu,
            CommandName::Up => Command::MenuUp,
            CommandName::Down => Command::MenuDown,
            CommandName::Left => Command::MenuLeft,
            CommandName::Right => Command::MenuRight,
            CommandName::Enter => Command::MenuEnter,
            CommandName::Back => Command::MenuBack,
            CommandName::DeblurOn => Command::DeblurQuickOn,
            CommandName::DeblurOff => Command::DeblurQuickOff,
            CommandName::Mode15bitOn => Command::Mode15BitQuickOn,
            CommandName::Mode15bitOff => Command::Mode15BitQuickOff,
        }
    }
}

/// A command issued at a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScriptedCommand {
    pub(crate) frame: u32,
    pub(crate) command: Command,
}

pub(crate) fn scripted_command(value: &str) -> anyhow::Result<ScriptedCommand> {
    let Some((frame, name)) = value.split_once(':') else {
        bail!("expected FRAME:COMMAND, got {value:?}");
    };
    let frame = frame
        .trim()
        .parse()
        .with_context(|| format!("invalid frame number {frame:?}"))?;
    let name = CommandName::from_str(name.trim(), true).map_err(anyhow::Error::msg)?;
    Ok(ScriptedCommand {
        frame,
        command: name.into(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hex_with_and_without_prefix() {
        assert_eq!(u8_from_hex("0x2A"), Ok(0x2A));
        assert_eq!(u8_from_hex("2a"), Ok(0x2A));
        assert_eq!(u32_from_hex("0XF7F733FF"), Ok(0xF7F7_33FF));
        assert!(u8_from_hex("0x100").is_err());
    }

    #[test]
    fn parse_scripted_commands() {
        let parsed = scripted_command("3:open-menu").unwrap();
        assert_eq!(
            parsed,
            ScriptedCommand {
                frame: 3,
                command: Command::OpenMenu
            }
        );
        assert_eq!(
            scripted_command("10: mode15bit-off").unwrap().command,
            Command::Mode15BitQuickOff
        );
        assert!(scripted_command("open-menu").is_err());
        assert!(scripted_command("x:open-menu").is_err());
        assert!(scripted_command("1:jump").is_err());
    }
}
