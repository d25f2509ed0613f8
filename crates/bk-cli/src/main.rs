use std::process::exit;

use bk_core::{Bookkeeping, CatalogError, FacetMap};
use bk_persistence::{PgCatalogStore, PoolProvider};
use serde::Serialize;

const USAGE: &str = "Uso:
  bk files|summary|runs|productions|steps [--facets '<JSON>']
  bk step --id <N>
  bk production-steps --production <N>
  bk pass resolve|add|children --path </A/B/C>
  bk pass list --id <N>
  bk ancestors --lfn <LFN>... [--depth <N>] [--all-replicas]
  bk descendants --lfn <LFN>... [--depth <N>] [--production <N>] [--all-replicas]";

/// Opciones `--clave valor` y banderas sueltas, en el orden dado.
#[derive(Debug, Default)]
struct Options {
    facets: Option<String>,
    path: Option<String>,
    id: Option<String>,
    production: Option<String>,
    depth: Option<String>,
    lfns: Vec<String>,
    /// Incluye en `WithMetadata` archivos sin réplica.
    all_replicas: bool,
}

fn parse_options(args: &[String]) -> Options {
    let mut opts = Options::default();
    let mut i = 0;
    while i < args.len() {
        let next = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--facets" => { opts.facets = next; i += 1; }
            "--path" => { opts.path = next; i += 1; }
            "--id" => { opts.id = next; i += 1; }
            "--production" => { opts.production = next; i += 1; }
            "--depth" => { opts.depth = next; i += 1; }
            "--lfn" => { opts.lfns.extend(next); i += 1; }
            "--all-replicas" => opts.all_replicas = true,
            other => eprintln!("[bk] argumento ignorado: {other}"),
        }
        i += 1;
    }
    opts
}

fn usage() -> ! {
    eprintln!("{USAGE}");
    exit(2)
}

fn int_arg(raw: Option<&String>, name: &str) -> i64 {
    match raw.map(|r| r.parse::<i64>()) {
        Some(Ok(v)) => v,
        Some(Err(_)) => { eprintln!("[bk] --{name} debe ser entero"); exit(2) }
        None => usage(),
    }
}

fn facets_arg(raw: Option<&String>) -> FacetMap {
    let Some(raw) = raw else {
        return FacetMap::new();
    };
    let parsed = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => { eprintln!("[bk] facets JSON parse error: {e}"); exit(3) }
    };
    FacetMap::from_json(parsed).unwrap_or_else(|e| fail(e))
}

/// Código de salida por clase de error: 3 entrada inválida, 4 no encontrado,
/// 5 fallo del store.
fn fail(err: CatalogError) -> ! {
    eprintln!("error: {err}");
    match err {
        CatalogError::InvalidFacet { .. } => exit(3),
        CatalogError::NotFound(_) => exit(4),
        CatalogError::Store(_) => exit(5),
    }
}

fn emit<T: Serialize>(result: Result<T, CatalogError>) -> ! {
    match result {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => { println!("{text}"); exit(0) }
            Err(e) => { eprintln!("error: {e}"); exit(5) }
        },
        Err(e) => fail(e),
    }
}

fn connect() -> Bookkeeping<PgCatalogStore<PoolProvider>> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("[bk] requiere DATABASE_URL para operar contra el catálogo");
        exit(4);
    }
    match bk_persistence::build_stores_from_env() {
        Ok((reader, writer)) => Bookkeeping::with_stores(reader, writer),
        Err(e) => { eprintln!("[bk] pool error: {e}"); exit(5) }
    }
}

fn main() {
    // Cargar .env si existe para obtener DATABASE_URL
    let _ = dotenvy::dotenv();
    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1).map(String::as_str) else { usage() };

    if command == "pass" {
        let Some(action) = args.get(2).map(String::as_str) else { usage() };
        let opts = parse_options(&args[3..]);
        let bk = connect();
        match (action, opts.path.as_deref()) {
            ("resolve", Some(path)) => emit(bk.resolve_processing_pass_id(path)),
            ("add", Some(path)) => emit(bk.add_processing_pass_path(path)),
            ("children", Some(path)) => emit(bk.list_processing_pass_children(path)),
            ("list", _) => emit(bk.list_processing_paths(int_arg(opts.id.as_ref(), "id"))),
            _ => usage(),
        }
    }

    let opts = parse_options(&args[2..]);
    let depth = opts.depth.as_ref().map(|_| int_arg(opts.depth.as_ref(), "depth")).unwrap_or(3);
    match command {
        "files" => emit(connect().find(&facets_arg(opts.facets.as_ref()))),
        "summary" => emit(connect().get_files_summary(&facets_arg(opts.facets.as_ref()))),
        "runs" => emit(connect().get_runs(&facets_arg(opts.facets.as_ref()))),
        "productions" => emit(connect().get_productions(&facets_arg(opts.facets.as_ref()))),
        "steps" => emit(connect().get_available_steps(&facets_arg(opts.facets.as_ref()))),
        "step" => emit(connect().get_step(int_arg(opts.id.as_ref(), "id"))),
        "production-steps" => emit(connect().get_production_steps(int_arg(opts.production.as_ref(), "production"))),
        "ancestors" if !opts.lfns.is_empty() => {
            emit(Ok(connect().get_file_ancestors(&opts.lfns, depth, !opts.all_replicas)))
        }
        "descendants" if !opts.lfns.is_empty() => {
            let production = opts.production.as_ref().map(|_| int_arg(opts.production.as_ref(), "production")).unwrap_or(0);
            emit(Ok(connect().get_file_descendants(&opts.lfns, depth, production, !opts.all_replicas)))
        }
        _ => usage(),
    }
}
