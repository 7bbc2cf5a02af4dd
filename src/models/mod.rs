pub mod ingest_config;
