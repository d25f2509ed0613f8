//! Constantes del núcleo de bookkeeping.

/// Profundidad mínima y máxima de recorrido de procedencia. Cualquier valor
/// pedido por el llamador se acota a este rango cerrado.
pub const MIN_TRAVERSAL_DEPTH: i64 = 1;
pub const MAX_TRAVERSAL_DEPTH: i64 = 10;

/// Saltos máximos al reconstruir la ruta de un processing pass hacia su raíz.
/// Coincide con la profundidad máxima conocida de los árboles de processing
/// pass; un recorrido que lo supera se trata como ruta inválida (posible
/// ciclo).
pub const MAX_PASS_HOPS: usize = 5;

/// Nombre de tipo de archivo que implica producciones de datos reales.
pub const RAW_FILE_TYPE: &str = "RAW";

/// Procedimientos almacenados que consume el motor de procedencia.
pub mod procedures {
    pub const FILE_ID: &str = "BOOKKEEPING.getFileId";
    pub const PRODUCING_JOB: &str = "BOOKKEEPING.getJobIdWithoutReplicaCheck";
    pub const JOB_INPUT_FILES: &str = "BOOKKEEPING.getJobInputFiles";
    pub const CONSUMING_JOBS: &str = "BOOKKEEPING.getConsumingJobs";
    pub const JOB_OUTPUT_FILES: &str = "BOOKKEEPING.getJobOutputFiles";
}
