use crate::constants::pagination;
use once_cell::sync::Lazy;
use reqwest::Method;
use std::collections::HashMap;

/// Shape of a tool's round trip: what kind of body goes out and how the
/// response envelope is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    /// GET returning `data` as an array (`[]` when the server omits it).
    List,
    /// GET returning `data` as a single entity (passed through, null included).
    Get,
    /// POST with a `{data: {attributes}}` JSON envelope.
    Create,
    /// PATCH with a `{data: {type?, id?, attributes}}` JSON envelope.
    Update,
    /// DELETE; the response body is ignored beyond the status check.
    Delete,
    /// POST with a multipart body built by the upload encoder.
    Upload,
}

/// One attribute copied from the argument bag into the write envelope.
/// `stringify` reproduces the remote's expectation that some numeric-ish
/// fields (sort position, parent id) arrive as strings.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub arg: &'static str,
    pub stringify: bool,
}

/// One argument translated to a query parameter, e.g. `page` → `page[number]`.
#[derive(Debug, Clone, Copy)]
pub struct QuerySpec {
    pub arg: &'static str,
    pub key: &'static str,
}

const PAGE: QuerySpec = QuerySpec {
    arg: "page",
    key: pagination::PAGE_NUMBER_KEY,
};
const PER_PAGE: QuerySpec = QuerySpec {
    arg: "per_page",
    key: pagination::PAGE_SIZE_KEY,
};

const fn field(arg: &'static str) -> FieldSpec {
    FieldSpec {
        arg,
        stringify: false,
    }
}

const fn string_field(arg: &'static str) -> FieldSpec {
    FieldSpec {
        arg,
        stringify: true,
    }
}

const fn query(arg: &'static str) -> QuerySpec {
    QuerySpec { arg, key: arg }
}

/// Everything the dispatcher needs to serve one tool: where the call goes,
/// what kind it is, and how arguments map onto the wire.
#[derive(Debug)]
pub struct EndpointSpec {
    pub name: &'static str,
    pub path: &'static str,
    pub kind: EndpointKind,
    /// `data.type` for write envelopes that carry one (the DAM family).
    pub envelope_type: Option<&'static str>,
    /// Argument whose value becomes `data.id` in the write envelope.
    pub id_arg: Option<&'static str>,
    pub attributes: &'static [FieldSpec],
    pub query: &'static [QuerySpec],
}

impl EndpointSpec {
    pub fn method(&self) -> Method {
        match self.kind {
            EndpointKind::List | EndpointKind::Get => Method::GET,
            EndpointKind::Create | EndpointKind::Upload => Method::POST,
            EndpointKind::Update => Method::PATCH,
            EndpointKind::Delete => Method::DELETE,
        }
    }
}

const fn endpoint(name: &'static str, path: &'static str, kind: EndpointKind) -> EndpointSpec {
    EndpointSpec {
        name,
        path,
        kind,
        envelope_type: None,
        id_arg: None,
        attributes: &[],
        query: &[],
    }
}

pub static ENDPOINTS: &[EndpointSpec] = &[
    // DAM (resource library)
    EndpointSpec {
        envelope_type: Some("dam_files"),
        ..endpoint("dam_upload_entity", "/dam/files", EndpointKind::Upload)
    },
    endpoint("dam_get_entity", "/dam/entities/{id}", EndpointKind::Get),
    EndpointSpec {
        envelope_type: Some("dam_files"),
        id_arg: Some("id"),
        attributes: &[field("name"), field("description")],
        ..endpoint("dam_update_entity", "/dam/files/{id}", EndpointKind::Update)
    },
    endpoint("dam_delete_entity", "/dam/entities/{id}", EndpointKind::Delete),
    EndpointSpec {
        query: &[PAGE, PER_PAGE, query("type"), query("name"), query("deleted")],
        ..endpoint("dam_list_entities", "/dam/entities", EndpointKind::List)
    },
    // Knowledge base
    EndpointSpec {
        attributes: &[
            field("title"),
            field("body"),
            string_field("position"),
            string_field("parent_id"),
        ],
        ..endpoint(
            "kb_create_article",
            "/kb/spaces/{space_id}/articles",
            EndpointKind::Create,
        )
    },
    endpoint(
        "kb_get_article",
        "/kb/spaces/{space_id}/articles/{article_id}",
        EndpointKind::Get,
    ),
    EndpointSpec {
        attributes: &[
            field("title"),
            field("body"),
            string_field("position"),
            string_field("parent_id"),
        ],
        ..endpoint(
            "kb_update_article",
            "/kb/spaces/{space_id}/articles/{article_id}",
            EndpointKind::Update,
        )
    },
    endpoint(
        "kb_delete_article",
        "/kb/spaces/{space_id}/articles/{article_id}",
        EndpointKind::Delete,
    ),
    EndpointSpec {
        query: &[PAGE, PER_PAGE, query("keywords"), query("parent_id")],
        ..endpoint(
            "kb_list_articles",
            "/kb/spaces/{space_id}/articles",
            EndpointKind::List,
        )
    },
    EndpointSpec {
        query: &[PAGE, PER_PAGE],
        ..endpoint("kb_list_knowledge_bases", "/kb/spaces", EndpointKind::List)
    },
    endpoint(
        "kb_get_knowledge_base",
        "/kb/spaces/{space_id}",
        EndpointKind::Get,
    ),
    // Site pages
    EndpointSpec {
        query: &[
            PAGE,
            PER_PAGE,
            query("parent_id"),
            query("deleted"),
            query("published"),
            query("keywords"),
            query("tags"),
        ],
        ..endpoint("site_list_pages", "/sites/{site_id}/pages", EndpointKind::List)
    },
    EndpointSpec {
        attributes: &[
            field("name"),
            field("template_name"),
            field("parent_id"),
            field("template_variables"),
            field("published"),
            field("position"),
        ],
        ..endpoint(
            "site_create_page",
            "/sites/{site_id}/pages",
            EndpointKind::Create,
        )
    },
    EndpointSpec {
        query: &[query("full_path")],
        ..endpoint(
            "site_get_page",
            "/sites/{site_id}/pages/{page_id}",
            EndpointKind::Get,
        )
    },
    EndpointSpec {
        attributes: &[
            field("name"),
            field("template_variables"),
            field("published"),
            field("position"),
        ],
        query: &[query("full_path")],
        ..endpoint(
            "site_update_page",
            "/sites/{site_id}/pages/{page_id}",
            EndpointKind::Update,
        )
    },
    endpoint(
        "site_delete_page",
        "/sites/{site_id}/pages/{page_id}",
        EndpointKind::Delete,
    ),
    // Site tags
    EndpointSpec {
        query: &[PAGE, PER_PAGE],
        ..endpoint("site_list_tags", "/sites/{site_id}/tags", EndpointKind::List)
    },
    EndpointSpec {
        attributes: &[field("name"), field("bg_color")],
        ..endpoint(
            "site_create_tag",
            "/sites/{site_id}/tags",
            EndpointKind::Create,
        )
    },
    EndpointSpec {
        query: &[query("name")],
        ..endpoint(
            "site_get_tag",
            "/sites/{site_id}/tags/{tag_id}",
            EndpointKind::Get,
        )
    },
    EndpointSpec {
        query: &[query("name")],
        ..endpoint(
            "site_delete_tag",
            "/sites/{site_id}/tags/{tag_id}",
            EndpointKind::Delete,
        )
    },
    // Sites
    EndpointSpec {
        query: &[PAGE, PER_PAGE],
        ..endpoint("site_list_sites", "/sites", EndpointKind::List)
    },
    endpoint("site_get_site", "/sites/{site_id}", EndpointKind::Get),
    // Themes
    EndpointSpec {
        query: &[query("from"), query("scope"), PAGE, PER_PAGE],
        ..endpoint("theme_list_themes", "/themes", EndpointKind::List)
    },
    // Members
    EndpointSpec {
        query: &[PAGE, PER_PAGE],
        ..endpoint("member_list_members", "/members", EndpointKind::List)
    },
    endpoint("member_get_member", "/members/{member_id}", EndpointKind::Get),
    // Users
    endpoint("user_get_current", "/user", EndpointKind::Get),
    EndpointSpec {
        query: &[PAGE, PER_PAGE],
        ..endpoint("user_list_users", "/users", EndpointKind::List)
    },
    // Integrations. organization_id is accepted by the schema but never
    // transmitted; the remote only reads it from a header this client does
    // not send.
    EndpointSpec {
        query: &[PAGE, PER_PAGE],
        ..endpoint(
            "integration_list_integrations",
            "/integrations",
            EndpointKind::List,
        )
    },
    endpoint(
        "integration_get_integration",
        "/integrations/{integration_id}",
        EndpointKind::Get,
    ),
];

static ENDPOINT_MAP: Lazy<HashMap<&'static str, &'static EndpointSpec>> =
    Lazy::new(|| ENDPOINTS.iter().map(|spec| (spec.name, spec)).collect());

pub fn endpoints() -> &'static [EndpointSpec] {
    ENDPOINTS
}

/// Exact-match, case-sensitive lookup. Absence is a normal outcome the
/// dispatcher turns into an "Unknown tool" failure.
pub fn endpoint_for(name: &str) -> Option<&'static EndpointSpec> {
    ENDPOINT_MAP.get(name).copied()
}
