//! Text console: read a line, parse a command, run it against the inventory

use std::io::{self, BufRead, Write};
use thiserror::Error;
use uw_core::{ItemId, ObjectPos};
use uw_inventory::{Inventory, InventoryError, ObjectRecord, PaperdollSlot};
use uw_savegame::{SaveError, SaveHeader, SaveManager, SavegameWriter};

/// Slot used when `save`/`load` get no slot name
const DEFAULT_SLOT: &str = uw_savegame::save::QUICKSAVE_SLOT;

const HELP: &str = "\
commands:
  help                         show this help
  list                         show the slot list of the open container
  paperdoll                    show the paperdoll slots
  open <pos>                   open the container at <pos>
  close                        close the open container
  float <pos>                  pick up the object at <pos>
  insert <kind> [amount]       create a new floating object
  drop [container|-] [pos|-]   drop the floating object
  weight                       show carried weight
  check                        verify the object graph
  save [slot]                  save to a slot (default: quicksave)
  load [slot]                  load from a slot (default: quicksave)
  slots                        list savegames
  dump                         print the inventory as JSON
  quit                         leave the console
positions and kinds are decimal or 0x-prefixed hex";

/// Console errors
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Supported commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    Paperdoll,
    Open(ObjectPos),
    Close,
    Float(ObjectPos),
    Insert { item_id: ItemId, amount: u16 },
    Drop {
        container: Option<ObjectPos>,
        target: Option<ObjectPos>,
    },
    Weight,
    Check,
    Save(String),
    Load(String),
    Slots,
    Dump,
    Quit,
    /// Known command with bad arguments
    Usage(&'static str),
    Unsupported(String),
}

fn parse_number(token: &str) -> Option<u16> {
    match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => token.parse().ok(),
    }
}

fn parse_pos(token: Option<&str>) -> Option<ObjectPos> {
    token.and_then(parse_number).and_then(ObjectPos::from_raw)
}

/// `-` or a missing token is the "none" sentinel
fn parse_optional_pos(token: Option<&str>) -> Result<Option<ObjectPos>, ()> {
    match token {
        None | Some("-") => Ok(None),
        Some(token) => parse_pos(Some(token)).map(Some).ok_or(()),
    }
}

/// Parse one input line
pub fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();

    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "list" | "ls" | "l" => Command::List,
        "paperdoll" | "pd" => Command::Paperdoll,
        "open" | "o" => match parse_pos(parts.next()) {
            Some(pos) => Command::Open(pos),
            None => Command::Usage("open <pos>"),
        },
        "close" | "c" => Command::Close,
        "float" | "f" => match parse_pos(parts.next()) {
            Some(pos) => Command::Float(pos),
            None => Command::Usage("float <pos>"),
        },
        "insert" | "i" => {
            let item_id = parts.next().and_then(parse_number).map(ItemId::new);
            let amount = parts.next().map_or(Some(1), parse_number);
            match (item_id, amount) {
                (Some(item_id), Some(amount)) if item_id.is_some() => {
                    Command::Insert { item_id, amount }
                }
                _ => Command::Usage("insert <kind> [amount]"),
            }
        }
        "drop" | "d" => {
            let container = parse_optional_pos(parts.next());
            let target = parse_optional_pos(parts.next());
            match (container, target) {
                (Ok(container), Ok(target)) => Command::Drop { container, target },
                _ => Command::Usage("drop [container|-] [pos|-]"),
            }
        }
        "weight" | "w" => Command::Weight,
        "check" => Command::Check,
        "save" => Command::Save(parts.next().unwrap_or(DEFAULT_SLOT).to_string()),
        "load" => Command::Load(parts.next().unwrap_or(DEFAULT_SLOT).to_string()),
        "slots" => Command::Slots,
        "dump" => Command::Dump,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unsupported(cmd),
    }
}

/// Debug console state
pub struct Console {
    inventory: Inventory,
    saves: SaveManager,
    player_name: String,
}

impl Console {
    pub fn new(inventory: Inventory, saves: SaveManager) -> Self {
        Self {
            inventory,
            saves,
            player_name: String::new(),
        }
    }

    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Read commands until end of input or `quit`
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<(), ConsoleError> {
        write!(out, "> ")?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                match self.execute(parse_command(line), out) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(err) => {
                        log::error!("{}: {}", line, err);
                        writeln!(out, "error: {}", err)?;
                    }
                }
            }
            write!(out, "> ")?;
            out.flush()?;
        }

        writeln!(out)?;
        Ok(())
    }

    /// Run one command; returns `false` when the console should exit
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<bool, ConsoleError> {
        match command {
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::List => self.print_slot_list(out)?,
            Command::Paperdoll => self.print_paperdoll(out)?,
            Command::Open(pos) => {
                if let Some(reason) = self.refuse_open(pos) {
                    writeln!(out, "cannot open {}: {}", pos, reason)?;
                } else {
                    self.inventory.open_container(pos);
                    self.print_slot_list(out)?;
                }
            }
            Command::Close => {
                if self.inventory.container_pos().is_none() {
                    writeln!(out, "no container is open")?;
                } else {
                    self.inventory.close_container();
                    self.print_slot_list(out)?;
                }
            }
            Command::Float(pos) => {
                if let Some(reason) = self.refuse_float(pos) {
                    writeln!(out, "cannot float {}: {}", pos, reason)?;
                } else {
                    let floating = self.inventory.float_object(pos)?;
                    writeln!(out, "floating {}", self.describe(floating))?;
                }
            }
            Command::Insert { item_id, amount } => {
                let record = if Inventory::is_container(item_id) {
                    ObjectRecord::container(item_id)
                } else {
                    ObjectRecord::new(item_id).with_amount(amount)
                };
                match self.inventory.insert_floating_item(record)? {
                    Some(pos) => writeln!(out, "floating {}", self.describe(pos))?,
                    None => writeln!(out, "an object is already floating")?,
                }
            }
            Command::Drop { container, target } => {
                if let Some(reason) = self.refuse_drop(container, target) {
                    writeln!(out, "cannot drop: {}", reason)?;
                } else if self.inventory.drop_floating_object(container, target) {
                    self.print_slot_list(out)?;
                } else {
                    writeln!(out, "the object doesn't fit there")?;
                }
            }
            Command::Weight => {
                let weight = self.inventory.inventory_weight();
                writeln!(out, "carrying {}.{} stones", weight / 10, weight % 10)?;
            }
            Command::Check => match self.inventory.check_invariants() {
                Ok(()) => writeln!(out, "object graph is consistent")?,
                Err(err) => writeln!(out, "{}", err)?,
            },
            Command::Save(slot) => {
                let header = SaveHeader::new(format!("inventory {}", slot))
                    .with_game_prefix("uw1")
                    .with_player_name(self.player_name.clone());
                let mut sg = SavegameWriter::new(header);
                self.inventory.save(&mut sg);
                let path = self.saves.save(&slot, sg)?;
                writeln!(out, "saved to {}", path.display())?;
            }
            Command::Load(slot) => {
                let mut sg = self.saves.load(&slot)?;
                self.inventory.load(&mut sg)?;
                self.print_slot_list(out)?;
            }
            Command::Slots => {
                for slot in self.saves.list_slots()? {
                    match &slot.header {
                        Some(header) => writeln!(
                            out,
                            "  {:<14} {:<24} {} ({})",
                            slot.id, header.title, header.player_name, header.timestamp
                        )?,
                        None => writeln!(out, "  {:<14} <unreadable>", slot.id)?,
                    }
                }
            }
            Command::Dump => {
                serde_json::to_writer_pretty(&mut *out, &self.inventory)?;
                writeln!(out)?;
            }
            Command::Quit => return Ok(false),
            Command::Usage(usage) => writeln!(out, "usage: {}", usage)?,
            Command::Unsupported(cmd) => writeln!(out, "unknown command {:?}, try help", cmd)?,
        }
        Ok(true)
    }

    fn refuse_open(&self, pos: ObjectPos) -> Option<&'static str> {
        if !self.inventory.pool().contains(pos) {
            return Some("no such position");
        }
        let record = self.inventory.object_info(pos);
        if !Inventory::is_container(record.item_id) || !record.has_contents_field() {
            return Some("not a container");
        }
        if self.inventory.container_pos() == Some(pos) {
            return Some("already open");
        }
        if let Some(floating) = self.inventory.floating_object_pos() {
            if pos == floating || self.holds(floating, pos) {
                return Some("it is floating");
            }
        }
        None
    }

    fn refuse_float(&self, pos: ObjectPos) -> Option<&'static str> {
        if self.inventory.floating_object_pos().is_some() {
            return Some("another object is floating");
        }
        if !self.inventory.pool().contains(pos) {
            return Some("no such position");
        }
        if self.inventory.object_info(pos).is_free() {
            return Some("slot is empty");
        }
        None
    }

    fn refuse_drop(&self, container: Option<ObjectPos>, target: Option<ObjectPos>) -> Option<&'static str> {
        let floating = self.inventory.floating_object_pos()?;
        for pos in container.into_iter().chain(target) {
            if !self.inventory.pool().contains(pos) {
                return Some("no such position");
            }
            if pos == floating || self.holds(floating, pos) {
                return Some("that is the floating object");
            }
        }
        if let Some(container) = container {
            let record = self.inventory.object_info(container);
            if !Inventory::is_container(record.item_id) || !record.has_contents_field() {
                return Some("not a container");
            }
        }
        None
    }

    /// Whether `pos` is somewhere inside `container`
    fn holds(&self, container: ObjectPos, pos: ObjectPos) -> bool {
        let mut pending = vec![container];
        while let Some(next) = pending.pop() {
            for inner in self.inventory.contents(next) {
                if inner == pos {
                    return true;
                }
                pending.push(inner);
            }
        }
        false
    }

    fn describe(&self, pos: ObjectPos) -> String {
        let record = self.inventory.object_info(pos);
        if record.is_free() {
            return format!("{} -", pos);
        }

        let mut text = format!("{} {}", pos, record.item_id);
        match record.amount() {
            Some(amount) => text.push_str(&format!(" x{}", amount)),
            None => text.push_str(&format!(" [{} inside]", self.inventory.contents(pos).count())),
        }
        if record.enchanted {
            text.push_str(" enchanted");
        }
        text
    }

    fn print_slot_list(&self, out: &mut impl Write) -> io::Result<()> {
        match self.inventory.container_pos() {
            Some(container) => writeln!(out, "container {}:", self.describe(container))?,
            None => writeln!(out, "topmost:")?,
        }
        for (index, &pos) in self.inventory.slot_list().iter().enumerate() {
            writeln!(out, "  {:>2}: {}", index, self.describe(pos))?;
        }
        if let Some(floating) = self.inventory.floating_object_pos() {
            writeln!(out, "floating: {}", self.describe(floating))?;
        }
        Ok(())
    }

    fn print_paperdoll(&self, out: &mut impl Write) -> io::Result<()> {
        for slot in PaperdollSlot::all() {
            writeln!(out, "  {:<14} {}", format!("{:?}", slot), self.describe(slot.pos()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console() -> (Console, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let console = Console::new(Inventory::new(), SaveManager::new(dir.path()))
            .with_player_name("Avatar");
        (console, dir)
    }

    fn run(console: &mut Console, line: &str) -> String {
        let mut out = Vec::new();
        console.execute(parse_command(line), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("open 0x13"), Command::Open(ObjectPos::new(19)));
        assert_eq!(parse_command("FLOAT 3"), Command::Float(ObjectPos::new(3)));
        assert_eq!(
            parse_command("insert 0x0080"),
            Command::Insert { item_id: ItemId::new(0x80), amount: 1 }
        );
        assert_eq!(
            parse_command("drop - 5"),
            Command::Drop { container: None, target: Some(ObjectPos::new(5)) }
        );
        assert_eq!(parse_command("drop"), Command::Drop { container: None, target: None });
        assert_eq!(parse_command("save"), Command::Save(DEFAULT_SLOT.to_string()));
        assert_eq!(parse_command("load uasave00002"), Command::Load("uasave00002".into()));
        assert_eq!(parse_command("q"), Command::Quit);
    }

    #[test]
    fn test_parse_bad_arguments() {
        assert!(matches!(parse_command("open"), Command::Usage(_)));
        assert!(matches!(parse_command("open 0xffff"), Command::Usage(_)));
        assert!(matches!(parse_command("insert 0xffff"), Command::Usage(_)));
        assert!(matches!(parse_command("drop x"), Command::Usage(_)));
        assert_eq!(parse_command("fly"), Command::Unsupported("fly".into()));
    }

    #[test]
    fn test_insert_and_drop() {
        let (mut console, _dir) = console();
        assert!(run(&mut console, "insert 0x0080").contains("floating"));
        run(&mut console, "drop");
        assert_eq!(
            console.inventory().object_info(ObjectPos::new(0)).item_id,
            ItemId::new(0x0080)
        );

        run(&mut console, "insert 0x00b0 3");
        run(&mut console, "drop 0");
        assert_eq!(console.inventory().contents(ObjectPos::new(0)).count(), 1);
        assert!(run(&mut console, "check").contains("consistent"));
    }

    #[test]
    fn test_refusals_do_not_panic() {
        let (mut console, _dir) = console();
        assert!(run(&mut console, "open 3").contains("not a container"));
        assert!(run(&mut console, "open 0x1000").contains("no such position"));
        assert!(run(&mut console, "float 2").contains("empty"));
        assert!(run(&mut console, "close").contains("no container"));

        run(&mut console, "insert 0x0001");
        assert!(run(&mut console, "float 2").contains("floating"));
        run(&mut console, "drop");

        let bag = run(&mut console, "insert 0x0080");
        let pos = bag.split_whitespace().nth(1).unwrap();
        assert!(run(&mut console, &format!("open 0x{}", pos)).contains("it is floating"));
        assert!(console.inventory().container_stack().is_empty());
        assert!(run(&mut console, "drop 4").contains("not a container"));
    }

    #[test]
    fn test_save_and_load() {
        let (mut console, _dir) = console();
        run(&mut console, "insert 0x0001");
        run(&mut console, "drop");
        assert!(run(&mut console, "save").contains("quicksave"));

        run(&mut console, "float 0");
        run(&mut console, "load");
        assert_eq!(console.inventory().floating_object_pos(), None);
        assert_eq!(
            console.inventory().object_info(ObjectPos::new(0)).item_id,
            ItemId::new(0x0001)
        );
        assert!(run(&mut console, "slots").contains("Avatar"));
    }

    #[test]
    fn test_dump_is_json() {
        let (mut console, _dir) = console();
        run(&mut console, "insert 0x0001");
        let dump = run(&mut console, "dump");
        let value: serde_json::Value = serde_json::from_str(&dump).unwrap();
        assert_eq!(value["pool_size"], 256);
        assert!(value["floating"].is_number());
    }

    #[test]
    fn test_run_until_quit() {
        let (mut console, _dir) = console();
        let input = "insert 1\ndrop\nquit\ninsert 2\n";
        let mut out = Vec::new();
        console.run(input.as_bytes(), &mut out).unwrap();

        assert_eq!(console.inventory().floating_object_pos(), None);
        assert!(console.inventory().object_info(ObjectPos::new(1)).is_free());
    }
}
