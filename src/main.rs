mod logging;

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;

use solarman_setup::api::{DeviceType, SolarmanApi, DEFAULT_BASE_URL};
use solarman_setup::config::Config;
use solarman_setup::prompt::{self, Prompter};

fn main() -> Result<()> {
    logging::init_logger();

    if std::env::args().len() > 1 {
        warn!("Arguments ignored. Tool is fully interactive and takes no flags");
    }

    println!("=== SolarmanPV Config Generator ===");

    let mut prompter = Prompter::stdio();
    let account = prompt::collect_account(&mut prompter)?;

    let api = SolarmanApi::new(DEFAULT_BASE_URL)?;

    info!("Requesting access token");
    let token = api.obtain_token(
        &account.appid,
        &account.secret,
        &account.username,
        &account.passhash,
    )?;

    info!("Fetching stationId");
    let station_id = api.station_id(&token)?;

    info!("Fetching inverterId");
    let inverter_id = api.device_serial(&token, station_id, DeviceType::Inverter)?;

    info!("Fetching loggerId");
    let logger_id = api.device_serial(&token, station_id, DeviceType::Collector)?;

    let meter_id = prompt::collect_meter_id(&mut prompter)?;
    let mqtt = prompt::collect_mqtt(&mut prompter)?;

    let config = Config {
        name: account.name,
        url: api.host().to_string(),
        appid: account.appid,
        secret: account.secret,
        username: account.username,
        passhash: account.passhash,
        station_id,
        inverter_id,
        logger_id,
        meter_id,
        debug: false,
        mqtt,
    };

    let path = config
        .write(Path::new("."))
        .context("could not write config file")?;
    println!("Config file created successfully at {}", path.display());

    Ok(())
}
