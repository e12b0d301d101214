use {
    findmy_config::SkillConfig,
    findmy_icloud::ICloudService,
    findmy_skill::{account::AccountLink, session::DeviceRecord},
};

/// Print the account's devices with the numbers a caller would say.
pub async fn handle_devices(config: SkillConfig) -> anyhow::Result<()> {
    let service = ICloudService::new(&config.account)?;
    let link = AccountLink::new(&service, &config.account);
    let devices = link.enumerate_devices().await?;

    if devices.is_empty() {
        eprintln!("No device on your account.");
        return Ok(());
    }
    print!("{}", format_listing(&devices, config.default_target()));
    Ok(())
}

fn format_listing(devices: &[DeviceRecord], default_target: Option<&str>) -> String {
    let mut out = String::new();
    for (index, device) in devices.iter().enumerate() {
        let marker = if Some(device.name.as_str()) == default_target {
            "  (default)"
        } else {
            ""
        };
        out.push_str(&format!("{index:>3}  {}{marker}\n", device.name));
    }
    out
}
