use bookkeeping_rust::demo::{self, DST_LFN, RAW_LFN};
use bookkeeping_rust::{AppError, Bookkeeping, CatalogStore, FacetMap};
use serde_json::{json, to_string_pretty};

/// Recorre las operaciones públicas sobre el store dado e imprime cada
/// resultado como JSON.
fn run_demo<S: CatalogStore>(bk: &Bookkeeping<S>) -> Result<(), AppError> {
    let facets = FacetMap::from_json(json!({"ConfigName": "LHCb",
                                            "ConfigVersion": "Collision12",
                                            "ProcessingPass": "/Real Data/Reco14",
                                            "Sort": {"Items": "FileName", "Order": "Asc"}}))?;
    println!("[find] {}", to_string_pretty(&bk.find(&facets)?)?);
    println!("[summary] {}", to_string_pretty(&bk.get_files_summary(&FacetMap::new())?)?);
    println!("[runs] {}", to_string_pretty(&bk.get_runs(&FacetMap::new())?)?);
    println!("[steps] {}",
             to_string_pretty(&bk.get_available_steps(&FacetMap::new().with("StartItem", 0).with("MaxItem", 10))?)?);

    let created = bk.add_processing_pass_path("/Real Data/Reco14/Stripping21")?;
    println!("[pass] created={created:?} paths={:?}", bk.list_processing_paths(1)?);
    println!("[pass] children(/Real Data/Reco14) {}",
             to_string_pretty(&bk.list_processing_pass_children("/Real Data/Reco14")?)?);

    println!("[ancestors] {}", to_string_pretty(&bk.get_file_ancestors(&[DST_LFN.to_string()], 3, true))?);
    println!("[descendants] {}",
             to_string_pretty(&bk.get_file_descendants(&[RAW_LFN.to_string()], 3, 0, true))?);
    Ok(())
}

#[cfg(feature = "pg_demo")]
fn run_pg_demo() -> Result<(), AppError> {
    let (reader, writer) =
        bk_persistence::build_stores_from_env().map_err(|e| AppError::Config(e.to_string()))?;
    let bk = Bookkeeping::with_stores(reader, writer);
    let facets = FacetMap::new().with("StartItem", 0).with("MaxItem", 5);
    println!("[pg find] {}", to_string_pretty(&bk.find(&facets)?)?);
    Ok(())
}

fn main() {
    // Cargar variables de entorno desde .env si existe (antes de leer DATABASE_URL)
    let _ = dotenvy::dotenv();

    let result = demo::sample_catalog().map_err(AppError::from)
                                       .and_then(|cat| run_demo(&Bookkeeping::new(&cat)));
    if let Err(e) = result {
        eprintln!("demo error: {e}");
        std::process::exit(1);
    }

    #[cfg(feature = "pg_demo")]
    {
        if std::env::var("DATABASE_URL").is_ok() {
            if let Err(e) = run_pg_demo() {
                eprintln!("pg demo error: {e}");
                std::process::exit(1);
            }
        } else {
            log::warn!("pg_demo: DATABASE_URL no definido, se omite la demo en Postgres");
        }
    }
}
