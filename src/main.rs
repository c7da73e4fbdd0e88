use anyhow::Result;
use chrono::Utc;
use locale_engine::format::{date_pattern, FormatOptions, LocaleFormatter, NumberStyle};
use locale_engine::{Config, CountryResolver, RouteLocaleCodec};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_engine=info".parse()?),
        )
        .init();

    info!("Starting locale detection probe");

    let config = Config::from_env()?;
    info!("State directory: {}", config.state_dir.display());

    let resolver = CountryResolver::from_config(&config)?;

    // Step 1: Language and country
    let language = resolver.detect_user_language(config.default_language).await;
    let country = resolver.detect_country().await;
    info!(
        "Detected language {} ({}), country {}",
        language.code(),
        language.native_name(),
        country.map(|c| c.to_string()).unwrap_or_else(|| "unknown".to_string())
    );

    // Step 2: Sample formats
    let formatter = LocaleFormatter::from_resolver(&resolver);
    let options = FormatOptions::new().language(language);
    let now = Utc::now();

    println!(
        "date:       {} ({})",
        formatter.format_date(now, &options),
        date_pattern(formatter.resolve_country(&options)).template()
    );
    println!("time:       {}", formatter.format_time(now, &options));
    println!("date+time:  {}", formatter.format_date_time(now, &options));
    println!("number:     {}", formatter.format_number(1234567.891, &options));
    println!(
        "percent:    {}",
        formatter.format_number(0.256, &options.clone().style(NumberStyle::Percent))
    );
    println!("currency:   {}", formatter.format_currency(1234.5, &options));

    // Step 3: Route token
    let codec = RouteLocaleCodec::from_resolver(&resolver);
    println!("locale:     {}", codec.get_locale_string(language, None));

    let report = resolver.metrics().report();
    info!("Detection metrics: {}", serde_json::to_string(&report)?);

    Ok(())
}
