use clap::Parser;
use serde_json::Value;
use url::Url;

#[derive(Parser)]
#[command(name = "rippled-cli")]
#[command(about = "Call rippled methods through a running passthrough", long_about = None)]
struct Cli {
    /// Base URL of the passthrough.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Upstream rippled URL, sent as the jrpcURL query parameter.
    #[arg(short = 'r', long)]
    rippled: Option<String>,

    /// rippled method, e.g. server_info or ledger.
    method: String,

    /// JSON params object; omitted means a GET with no params.
    params: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let endpoint = method_url(&cli.url, &cli.method)?;

    let request = match cli.params {
        Some(params) => {
            // Fail locally on malformed JSON instead of round-tripping it.
            let params: Value = serde_json::from_str(&params)?;
            client.post(endpoint).json(&params)
        }
        None => client.get(endpoint),
    };
    let request = match cli.rippled {
        Some(rippled) => request.query(&[("jrpcURL", rippled)]),
        None => request,
    };

    print_response(request.send().await?).await
}

/// `base` with `method` appended as one percent-encoded path segment.
fn method_url(base: &str, method: &str) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("{} cannot be a base URL", base))?
        .pop_if_empty()
        .push(method);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Err(format!("passthrough returned status {}", status).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        assert_eq!(
            method_url("http://localhost:8080", "server_info").unwrap().as_str(),
            "http://localhost:8080/server_info"
        );
        assert_eq!(
            method_url("http://localhost:8080/api/", "ledger").unwrap().as_str(),
            "http://localhost:8080/api/ledger"
        );
        assert_eq!(
            method_url("http://localhost:8080", "a/b c").unwrap().as_str(),
            "http://localhost:8080/a%2Fb%20c"
        );
        assert!(method_url("mailto:x@y", "ledger").is_err());
    }
}
