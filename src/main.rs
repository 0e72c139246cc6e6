mod blocks;
mod client;
mod display;
mod form;
mod grid;
mod theme;
mod web;

fn print_usage() {
    println!("Usage:");
    println!("  horario-prefs web [port]          start the preferences server (default port 8080)");
    println!("  horario-prefs form [server-url]   fill in and submit preferences interactively");
    println!();
    println!("Environment:");
    println!("  BLOCKS_CSV   path to a custom grid definition (id,dia,hora)");
    println!("  SERVER_URL   default server for form mode (http://localhost:8080)");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("web") => {
            let port = args
                .get(2)
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);

            let blocks = match std::env::var("BLOCKS_CSV") {
                Ok(path) => {
                    println!("Loading time blocks from {}...", path);
                    blocks::load_blocks(&path)?
                }
                Err(_) => blocks::default_blocks(),
            };

            println!("Starting preferences server on port {}...", port);
            println!("Grid: {} time blocks", blocks.len());
            println!("Access the site at http://localhost:{}", port);

            web::start_server(port, blocks).await?;
        }
        Some("form") => {
            let server = args
                .get(2)
                .cloned()
                .or_else(|| std::env::var("SERVER_URL").ok())
                .unwrap_or_else(|| "http://localhost:8080".to_string());

            client::run_form(&server).await?;
        }
        _ => print_usage(),
    }

    Ok(())
}
