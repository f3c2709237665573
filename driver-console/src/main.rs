//! Consola interactiva para conductores
//!
//! Login contra la API, listado de las rutas asignadas, actualización de
//! estado y consulta de la vista pública.

use anyhow::{anyhow, bail, Context, Result};
use colored::*;
use reqwest::{Client, Method};
use serde_json::{json, Map, Value};
use std::io::{self, Write};

const DEFAULT_API_URL: &str = "http://localhost:3000/api";

struct Session {
    client: Client,
    base_url: String,
    token: String,
    user_id: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚌 Bus Fleet Driver Console".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    let base_url = std::env::var("BUS_FLEET_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    println!("{} {}", "🌐 API:".bright_blue(), base_url);

    let session = login(Client::new(), base_url).await?;

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 🛣️  Mis rutas");
        println!("2. 🔄 Actualizar estado de una ruta");
        println!("3. 🌍 Ver estado público de un autobús");
        println!("4. 🚪 Salir");

        let choice = prompt("Selecciona una opción (1-4): ")?;
        let result = match choice.as_str() {
            "1" => list_my_routes(&session).await,
            "2" => update_status(&session).await,
            "3" => public_status(&session).await,
            "4" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                continue;
            }
        };

        if let Err(e) = result {
            println!("{} {}", "❌".bright_red(), e.to_string().bright_red());
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Ejecutar una request y devolver `data`, o el mensaje de error de la API
async fn call(
    client: &Client,
    method: Method,
    url: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<Value> {
    let mut request = client.request(method, url);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await.with_context(|| format!("request to {} failed", url))?;
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if !status.is_success() {
        let message = body["message"].as_str().unwrap_or("unknown error");
        bail!("{} ({})", message, status);
    }

    Ok(body["data"].clone())
}

async fn login(client: Client, base_url: String) -> Result<Session> {
    println!();
    println!("{}", "🔐 LOGIN".bright_cyan().bold());
    println!("{}", "========".bright_cyan());

    loop {
        let email = prompt("Email: ")?;
        let password = prompt("Password: ")?;

        let url = format!("{}/auth/login", base_url);
        let payload = json!({ "email": email, "password": password });

        match call(&client, Method::POST, &url, None, Some(payload)).await {
            Ok(data) => {
                let token = data["token"]
                    .as_str()
                    .ok_or_else(|| anyhow!("login response without token"))?
                    .to_string();
                let user_id = data["user"]["id"]
                    .as_str()
                    .ok_or_else(|| anyhow!("login response without user id"))?
                    .to_string();
                let name = data["user"]["name"].as_str().unwrap_or("");

                println!("{} {}", "✅ Bienvenido,".bright_green(), name.bright_green().bold());
                return Ok(Session {
                    client,
                    base_url,
                    token,
                    user_id,
                });
            }
            Err(e) => println!("{} {}", "❌ Login fallido:".bright_red(), e),
        }
    }
}

async fn my_routes(session: &Session) -> Result<Vec<Value>> {
    let url = format!("{}/routes", session.base_url);
    let data = call(&session.client, Method::GET, &url, Some(&session.token), None).await?;

    Ok(data
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|route| route["driverId"].as_str() == Some(session.user_id.as_str()))
        .collect())
}

fn print_route(route: &Value) {
    let active = if route["isActive"].as_bool().unwrap_or(false) {
        "ACTIVA".bright_green()
    } else {
        "INACTIVA".bright_red()
    };

    println!(
        "🚌 {} - {} [{}]",
        route["busNumber"].as_str().unwrap_or("?").bold(),
        route["name"].as_str().unwrap_or("?"),
        active
    );
    println!(
        "   👥 {}/{} ({}%)  📍 índice {}",
        route["currentPassengers"],
        route["maxCapacity"],
        route["occupancyPercentage"],
        route["currentPointIndex"]
    );

    for stop in route["routePoints"].as_array().into_iter().flatten() {
        let mark = if stop["isPassed"].as_bool().unwrap_or(false) {
            "✔".bright_green()
        } else {
            "·".normal()
        };
        println!(
            "   {} {:>2}. {}",
            mark,
            stop["order"],
            stop["point"]["name"].as_str().unwrap_or("?")
        );
    }
}

async fn list_my_routes(session: &Session) -> Result<()> {
    let routes = my_routes(session).await?;
    if routes.is_empty() {
        println!("{}", "ℹ️  No tienes rutas asignadas".bright_yellow());
        return Ok(());
    }

    for route in &routes {
        println!();
        print_route(route);
    }
    Ok(())
}

fn parse_optional<T: std::str::FromStr>(input: &str, field: &str) -> Result<Option<T>> {
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse()
        .map(Some)
        .map_err(|_| anyhow!("valor inválido para {}: '{}'", field, input))
}

async fn update_status(session: &Session) -> Result<()> {
    let routes = my_routes(session).await?;
    if routes.is_empty() {
        println!("{}", "ℹ️  No tienes rutas asignadas".bright_yellow());
        return Ok(());
    }

    let bus_number = prompt("Número del autobús: ")?;
    let route = routes
        .iter()
        .find(|route| route["busNumber"].as_str() == Some(bus_number.as_str()))
        .ok_or_else(|| anyhow!("no tienes asignado el autobús '{}'", bus_number))?;
    let route_id = route["id"].as_str().ok_or_else(|| anyhow!("route without id"))?;

    println!("{}", "(deja vacío para no modificar)".dimmed());
    let passengers: Option<i32> = parse_optional(&prompt("Pasajeros actuales: ")?, "pasajeros")?;
    let index: Option<i32> = parse_optional(&prompt("Índice de parada actual: ")?, "índice")?;
    let active: Option<bool> = match prompt("¿Activa? (s/n): ")?.as_str() {
        "" => None,
        "s" | "S" => Some(true),
        "n" | "N" => Some(false),
        other => bail!("valor inválido para activa: '{}'", other),
    };

    let mut patch = Map::new();
    if let Some(passengers) = passengers {
        patch.insert("currentPassengers".to_string(), json!(passengers));
    }
    if let Some(index) = index {
        patch.insert("currentPointIndex".to_string(), json!(index));
    }
    if let Some(active) = active {
        patch.insert("isActive".to_string(), json!(active));
    }

    if patch.is_empty() {
        println!("{}", "ℹ️  Nada que actualizar".bright_yellow());
        return Ok(());
    }

    let url = format!("{}/routes/{}/status", session.base_url, route_id);
    let data = call(
        &session.client,
        Method::PUT,
        &url,
        Some(&session.token),
        Some(Value::Object(patch)),
    )
    .await?;

    println!("{}", "✅ Estado actualizado".bright_green().bold());
    print_route(&data["route"]);
    Ok(())
}

async fn public_status(session: &Session) -> Result<()> {
    let bus_number = prompt("Número del autobús: ")?;
    let url = format!("{}/public/bus/{}", session.base_url, bus_number);
    let view = call(&session.client, Method::GET, &url, None, None).await?;

    println!();
    println!(
        "🚌 {} - {}",
        view["busNumber"].as_str().unwrap_or("?").bold(),
        view["routeName"].as_str().unwrap_or("?")
    );
    println!("   👥 Ocupación: {}%", view["occupancyPercentage"]);

    let stop_name = |stop: &Value| stop["name"].as_str().map(str::to_string);
    println!(
        "   📍 Parada actual: {}",
        stop_name(&view["currentPoint"]).unwrap_or_else(|| "-".to_string())
    );
    println!(
        "   ➡️  Próxima parada: {}",
        stop_name(&view["nextPoint"]).unwrap_or_else(|| "-".to_string())
    );
    Ok(())
}
