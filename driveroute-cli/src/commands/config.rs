use anyhow::Result;
use driveroute::Config;

fn presence(value: Option<&str>) -> &'static str {
    if value.is_some() {
        "set"
    } else {
        "not set"
    }
}

pub fn run(config: &Config) -> Result<()> {
    println!("API key:          {}", presence(config.api_key.as_deref()));
    println!(
        "Browser map key:  {}",
        presence(config.maps_browser_key.as_deref())
    );
    println!("Expose map key:   {}", config.expose_maps_key);
    println!("Frontend origin:  {}", config.frontend_origin);
    println!("Language:         {}", config.language.code());
    println!("Region:           {}", config.region);
    println!("Timeout:          {}s", config.timeout.as_secs());
    println!("Geocoding URL:    {}", config.geocoding_url);
    println!("Routes URL:       {}", config.routes_url);

    Ok(())
}
