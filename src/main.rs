//! Send LG vendor DDC/CI commands to a monitor.
//!
//! Usage:
//!   lgddc --bus 4 read-model-str
//!   lgddc --bus 4 --debug set-language 2
//!   lgddc --bus 4 read-edid
//!   lgddc --bus 4 read-eeprom

use std::time::Duration;
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use lgddc::{commands, HexBytes, I2cDeviceLgDdc, LgDdc, Timing};

/// Send LG vendor DDC/CI commands to a monitor
#[derive(Parser)]
#[command(name = "lgddc")]
#[command(about = "Send LG vendor DDC/CI commands to a monitor")]
struct Cli {
    /// I2C bus number (/dev/i2c-N)
    #[arg(short, long)]
    bus: u32,

    /// Log every frame written and reply read
    #[arg(short, long)]
    debug: bool,

    /// Delay between a command write and its reply read, in milliseconds
    #[arg(long, default_value_t = lgddc::DELAY_COMMAND_SETTLE_MS)]
    settle_ms: u64,

    /// Delay between the EDID pointer write and the block read, in milliseconds
    #[arg(long, default_value_t = lgddc::DELAY_EDID_SETTLE_MS)]
    edid_settle_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Select the on-screen display language
    #[command(alias = "set_language")]
    SetLanguage {
        /// Language index (0-255)
        #[arg(allow_negative_numbers = true)]
        lang: i64,
    },

    /// Read the model string
    #[command(alias = "read_model_str")]
    ReadModelStr,

    /// Dump the raw EDID block
    #[command(alias = "read_edid")]
    ReadEdid,

    /// Dump the internal EEPROM
    #[command(alias = "read_eeprom")]
    ReadEeprom,

    /// Select the active video input
    #[command(alias = "input_select")]
    InputSelect {
        /// Input index (0-255)
        #[arg(allow_negative_numbers = true)]
        display: i64,
    },

    /// Reset monitor settings to factory defaults
    #[command(alias = "system_reset")]
    SystemReset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Some(command) => command,
        None => {
            Cli::command().print_help()?;
            return Ok(())
        },
    };

    init_logging(cli.debug);

    let timing = Timing {
        command_settle: Duration::from_millis(cli.settle_ms),
        edid_settle: Duration::from_millis(cli.edid_settle_ms),
    };
    let mut ddc = LgDdc::from_bus(cli.bus)
        .with_context(|| format!("failed to open /dev/i2c-{}", cli.bus))?
        .with_timing(timing);

    match command {
        Commands::SetLanguage { lang } => cmd_set_language(&mut ddc, lang),
        Commands::ReadModelStr => cmd_read_model_str(&mut ddc),
        Commands::ReadEdid => cmd_read_edid(&mut ddc),
        Commands::ReadEeprom => cmd_read_eeprom(&mut ddc),
        Commands::InputSelect { display } => cmd_input_select(&mut ddc, display),
        Commands::SystemReset => cmd_system_reset(&mut ddc),
    }
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn print_reply(reply: &lgddc::Reply) {
    println!("{}", HexBytes(reply));
    match reply.payload() {
        Ok(payload) => log::debug!("reply payload: {}", HexBytes(payload)),
        Err(e) => log::debug!("reply is not a DDC/CI envelope: {}", e),
    }
}

fn cmd_set_language(ddc: &mut I2cDeviceLgDdc, lang: i64) -> Result<()> {
    let command = commands::SelectLanguage::from_index(lang)?;
    ddc.execute(command).context("failed to set language")
}

fn cmd_read_model_str(ddc: &mut I2cDeviceLgDdc) -> Result<()> {
    let model = ddc.get_model_str().context("failed to read model string")?;
    print_reply(&model);
    println!("{}", model.to_ascii_lossy());

    Ok(())
}

fn cmd_read_edid(ddc: &mut I2cDeviceLgDdc) -> Result<()> {
    let edid = ddc.read_edid().context("failed to read EDID")?;
    println!("{}", HexBytes(&edid));

    Ok(())
}

fn cmd_read_eeprom(ddc: &mut I2cDeviceLgDdc) -> Result<()> {
    for page in commands::eeprom_pages() {
        let data = ddc.execute(page)
            .with_context(|| format!("failed to read EEPROM page {:04x}", page.address()))?;
        println!("{:04x}: {}", page.address(), HexBytes(&data));
    }

    Ok(())
}

fn cmd_input_select(ddc: &mut I2cDeviceLgDdc, display: i64) -> Result<()> {
    let command = commands::InputSelect::from_index(display)?;
    let reply = ddc.execute(command).context("failed to select input")?;
    print_reply(&reply);

    Ok(())
}

fn cmd_system_reset(ddc: &mut I2cDeviceLgDdc) -> Result<()> {
    let reply = ddc.system_reset().context("failed to reset monitor")?;
    print_reply(&reply);

    Ok(())
}
