//! `aether capabilities` - print the plugin's declarations.

use aether_plugin::{DeclaredModel, DensityModel};
use anyhow::Result;

use super::OutputFormat;

pub(crate) fn show_capabilities(format: OutputFormat) -> Result<()> {
    let caps = DeclaredModel.capabilities();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&caps)?),
        OutputFormat::Pretty => {
            println!("prog id:               {}", caps.prog_id);
            println!("guid:                  {}", caps.guid);
            println!("central body:          {}", caps.central_body);
            println!("temperature:           {}", caps.computes_temperature);
            println!("pressure:              {}", caps.computes_pressure);
            println!("augmented space wx:    {}", caps.uses_augmented_space_weather);
            println!("lowest valid altitude: {} m", caps.lowest_valid_altitude_m);
        },
    }
    Ok(())
}
