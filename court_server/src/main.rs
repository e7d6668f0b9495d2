// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use actix::prelude::*;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use court_server::client::{self, LogGateway};
use court_server::content::Catalog;
use court_server::core::{Core, Settings};
use court_server::options::Options;
use court_server::server::{ParametrizedGameRequest, StatusRequest};
use log::error;
use std::process;
use std::time::Duration;
use structopt::StructOpt;

fn main() {
    actix_web::rt::System::new().block_on(async {
        if std::env::var("RUST_LOG").is_err() {
            std::env::set_var("RUST_LOG", "court_server=info,actix_web=info");
        }
        env_logger::init();

        let options = Options::from_args();

        let catalog = match Catalog::load(&options.content_dir) {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        };

        let core = Core::start(Core::new(
            Settings {
                min_players: options.min_players,
                game_timeout: options.game_timeout_secs * 1000,
                catalog,
            },
            Duration::from_secs(options.sweep_interval_secs),
        ));
        let core_clone = core.to_owned();
        let http_port = options.http_port;

        HttpServer::new(move || {
            let core_clone_1 = core_clone.to_owned();
            let core_clone_2 = core_clone.to_owned();

            App::new()
                .wrap(middleware::Logger::default())
                .service(web::resource("/client/").route(web::post().to(
                    move |request: web::Json<ParametrizedGameRequest>| {
                        let core = core_clone_1.to_owned();

                        async move {
                            match core.send(request.0).await {
                                Ok(result) => match result {
                                    Ok(response) => {
                                        let outcome = client::finish(&LogGateway, response).await;
                                        let body = serde_json::to_vec(&outcome).unwrap();
                                        HttpResponse::Ok().body(body)
                                    }
                                    Err(e) => {
                                        let body = serde_json::to_vec(&e).unwrap();
                                        HttpResponse::BadRequest().body(body)
                                    }
                                },
                                Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
                            }
                        }
                    },
                )))
                .service(web::resource("/status/").route(web::get().to(move || {
                    let core = core_clone_2.to_owned();

                    async move {
                        match core.send(StatusRequest).await {
                            Ok(status) => {
                                let body = serde_json::to_vec(&status).unwrap();
                                HttpResponse::Ok().body(body)
                            }
                            Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
                        }
                    }
                })))
        })
        .bind(("0.0.0.0", http_port))
        .unwrap_or_else(|e| panic!("could not listen at port {}: {}", http_port, e))
        .run()
        .await
        .unwrap();
    });
}
