use anyhow::Context;
use clap::Parser;
use n64adv_controller::flash::{CONFIG_VERSION, FlashStorage};
use n64adv_controller::menu::{MenuAction, STANDARD_MENU};
use n64adv_controller::settings::load_defaults;
use n64adv_controller::{Configuration, ControlLoop, Peripherals, Snapshot};

use cli::{Commands, RunArgs};
use sim::{
    ConsoleRenderer, ConsoleTransmitter, CountingVsync, FileFlash, ScriptedController, SimBus,
};

mod cli;
mod sim;
mod util;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args)?,
        Commands::Show { image } => {
            let flash = FileFlash::open(&image)?;
            let mut storage = FlashStorage::new(flash, 0)?;
            for (slot, record) in storage.slots()?.iter().enumerate() {
                match record {
                    Some(record) => {
                        let stale = if record.version == CONFIG_VERSION {
                            ""
                        } else {
                            " (unsupported version)"
                        };
                        println!(
                            "slot {slot}: version {}{stale}, sequence {}",
                            record.version, record.sequence
                        );
                        print_snapshot(&record.snapshot);
                    }
                    None => println!("slot {slot}: empty"),
                }
            }
        }
        Commands::Defaults => {
            let mut config = Configuration::new();
            load_defaults(&mut config);
            print_snapshot(&config.snapshot());
        }
    }
    Ok(())
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let storage = match &args.flash {
        Some(path) => Some(
            FlashStorage::new(FileFlash::open(path)?, 0)
                .context("flash image cannot hold configuration slots")?,
        ),
        None => None,
    };

    let video_info = |interlaced: bool| {
        (interlaced as u32) | ((args.pal as u32) << 1) | ((args.fallback as u32) << 2)
    };
    let bus = SimBus {
        forced_state: args.forced_state,
        jumpers: args.jumpers as u32,
        video_info: video_info(args.interlaced_from == Some(0)),
        ..Default::default()
    };

    println!("boot");
    let mut control = ControlLoop::boot(
        Peripherals {
            registers: bus,
            controller: ScriptedController::new(&args.commands),
            transmitter: ConsoleTransmitter::default(),
            renderer: ConsoleRenderer,
            vsync: CountingVsync::default(),
            storage,
        },
        STANDARD_MENU,
    );
    println!("configuration from {:?}", control.boot_source());
    print_snapshot(&control.config().snapshot());

    for frame in 1..=args.frames {
        println!("frame {frame}");
        if args.interlaced_from == Some(frame) {
            control.registers_mut().video_info = video_info(true);
        }
        let action = control.step();
        if action != MenuAction::None {
            println!("    menu: {action:?}");
        }
    }

    println!("final configuration");
    print_snapshot(&control.config().snapshot());
    if let Some(storage) = control.storage() {
        storage.flash().persist()?;
    }
    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    let [misc, video, image_240p, image_480i] = snapshot.words();
    println!("    misc/menu  {misc:#04x}");
    println!("    video      {video:#04x}");
    println!("    240p image {image_240p:#04x}");
    println!("    480i image {image_480i:#04x}");
}
