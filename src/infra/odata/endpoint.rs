use url::form_urlencoded::Serializer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Text(String),
    List(Vec<String>),
}

pub type QueryParams = Vec<(String, Option<QueryParam>)>;

/// Form-encodes parameters, repeating the key for each list element.
pub fn build_query_params(params: &QueryParams) -> String {
    let mut serializer = Serializer::new(String::new());
    for (key, value) in params {
        match value {
            None => {}
            Some(QueryParam::Text(text)) => {
                serializer.append_pair(key, text);
            }
            Some(QueryParam::List(items)) => {
                for item in items {
                    serializer.append_pair(key, item);
                }
            }
        }
    }
    serializer.finish()
}

/// Collects `key=value` pairs, folding repeated keys into a list. An empty
/// value yields `None`.
pub fn parse_query_params<'a>(pairs: impl IntoIterator<Item = &'a str>) -> QueryParams {
    let mut params: QueryParams = Vec::new();
    for pair in pairs {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = (!value.is_empty()).then(|| value.to_string());
        let position = params.iter().position(|(existing, _)| existing == key);
        match (position, value) {
            (Some(index), Some(value)) => {
                let entry = &mut params[index].1;
                *entry = Some(match entry.take() {
                    Some(QueryParam::Text(first)) => QueryParam::List(vec![first, value]),
                    Some(QueryParam::List(mut items)) => {
                        items.push(value);
                        QueryParam::List(items)
                    }
                    None => QueryParam::Text(value),
                });
            }
            (Some(_), None) => {}
            (None, value) => params.push((key.to_string(), value.map(QueryParam::Text))),
        }
    }
    params
}

/// Joins `base` and `path` with exactly one slash and appends `query`, which
/// may or may not carry the leading `?`.
pub fn build_endpoint(base: &str, path: &str, query: Option<&str>) -> String {
    let clean_path = path.strip_prefix('/').unwrap_or(path);
    let clean_base = base.strip_suffix('/').unwrap_or(base);
    let mut endpoint = if clean_path.is_empty() {
        clean_base.to_string()
    } else {
        format!("{clean_base}/{clean_path}")
    };

    if let Some(query) = query.filter(|query| !query.is_empty()) {
        if !query.starts_with('?') {
            endpoint.push('?');
        }
        endpoint.push_str(query);
    }

    endpoint
}
