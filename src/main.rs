// src/main.rs

use actix_web::{get, middleware, web, App, HttpResponse, HttpServer};
use sqlx::{Pool, Postgres};

// Importa os módulos da aplicação
mod dashboard; // Módulo do resumo financeiro (métricas)
mod gastos; // Módulo de gastos
mod shared; // Módulo shared
mod usuarios; // Módulo de usuários
mod vendas; // Módulo de vendas

use shared::shared_structs::GenericResponse;

// Estado compartilhado que contém a conexão com o banco de dados e a chave secreta JWT.
pub struct AppState {
    pub db_pool: Pool<Postgres>,
    pub jwt_secret: String,
}

/// Configuração lida das variáveis de ambiente.
struct Config {
    database_url: String,
    jwt_secret: String,
    porta: u16,
}

/// Lê a configuração do ambiente. As variáveis obrigatórias derrubam a
/// aplicação na partida se estiverem ausentes; host e porta têm padrão.
fn carregar_config() -> Config {
    let db_host = std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
    let db_user = std::env::var("DB_USER").expect("DB_USER não definida");
    let db_password = std::env::var("DB_PASSWORD").expect("DB_PASSWORD não definida");
    let db_name = std::env::var("DB_NAME").expect("DB_NAME não definida");
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET não definida");
    let porta = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("PORT inválida");

    Config {
        database_url: format!(
            "postgres://{}:{}@{}/{}",
            db_user, db_password, db_host, db_name
        ),
        jwt_secret,
        porta,
    }
}

/// Rota de verificação de saúde da API.
#[get("/")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(GenericResponse::sucesso(
        "API Financeiro no ar!",
        serde_json::json!({
            "service": "financeiro",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    ))
}

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Carrega um eventual arquivo .env antes de ler o ambiente
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = carregar_config();

    // Conecta ao banco de dados PostgreSQL usando um pool de conexões.
    // O tipo das colunas de valores deve ser NUMERIC para compatibilidade
    // com bigdecimal::BigDecimal (ver schema.sql).
    let db_pool = Pool::<Postgres>::connect(&config.database_url)
        .await
        .expect("Falha ao conectar ao banco PostgreSQL");

    // Cria um estado compartilhado da aplicação com o pool de conexões.
    // web::Data é usado para compartilhar dados imutáveis entre as rotas.
    let app_state = web::Data::new(AppState {
        db_pool,
        jwt_secret: config.jwt_secret,
    });

    log::info!("Iniciando API Financeiro na porta {}...", config.porta);

    // Configura e inicia o servidor HTTP.
    HttpServer::new(move || {
        App::new()
            // .clone() é necessário porque a closure é movida
            // e pode ser executada várias vezes.
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            // Verificação de saúde
            .service(health_check)
            // Módulo de Usuários
            .service(usuarios::usuario_router::cadastrar_usuario)
            .service(usuarios::usuario_router::login_usuario)
            .service(usuarios::usuario_router::buscar_perfil)
            .service(usuarios::usuario_router::atualizar_perfil)
            .service(usuarios::usuario_router::esqueci_senha)
            .service(usuarios::usuario_router::redefinir_senha)
            // Módulo de Gastos
            .service(gastos::gasto_router::listar_gastos)
            .service(gastos::gasto_router::cadastrar_gasto)
            .service(gastos::gasto_router::atualizar_gasto)
            .service(gastos::gasto_router::deletar_gasto)
            // Módulo de Vendas
            .service(vendas::venda_router::listar_vendas)
            .service(vendas::venda_router::cadastrar_venda)
            .service(vendas::venda_router::atualizar_venda)
            .service(vendas::venda_router::deletar_venda)
            // Módulo do Dashboard
            .service(dashboard::dashboard_router::resumo_financeiro)
    })
    // Vincula o servidor ao endereço IP e porta. O '?' propaga erros.
    .bind(("0.0.0.0", config.porta))?
    // Inicia o servidor.
    .run()
    // Aguarda a finalização do servidor.
    .await
}
