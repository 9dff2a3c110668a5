pub mod env {
    pub const TOKEN: &str = "BAKLIB_TOKEN";
    pub const API_BASE: &str = "BAKLIB_API_BASE";
    pub const DEFAULT_API_BASE: &str = "https://open.baklib.com/api/v1";
}

pub mod pagination {
    pub const PAGE_NUMBER_KEY: &str = "page[number]";
    pub const PAGE_SIZE_KEY: &str = "page[size]";
}

pub mod upload {
    pub const TYPE_FIELD: &str = "data[type]";
    pub const FILE_FIELD: &str = "data[attributes][file]";
    pub const DAM_FILES_TYPE: &str = "dam_files";
    pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";
    pub const DEFAULT_RESOURCE_TYPE: &str = "file";
}
