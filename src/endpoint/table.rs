//! Static description of every endpoint the client knows.
//!
//! Nodes are keyed by their dotted capability path (`cards.multiverse`); a
//! node's children are the entries whose key extends it by one segment.

use crate::client::Method;

/// Descriptor of one endpoint node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Dotted capability path
    pub key: &'static str,
    /// Path template relative to the API root, with `{param}` slots
    pub template: &'static str,
    /// Path parameters in positional order
    pub params: &'static [&'static str],
    /// Query parameters positional arguments may fill once the path is complete
    pub query_positional: &'static [&'static str],
    /// Whether the result is a paginated list
    pub paginated: bool,
    /// HTTP method
    pub method: Method,
    /// Path values are lower-cased, trimmed and `_` becomes `-`
    pub normalize: bool,
}

/// A keyword that, given to `node`, redirects to `target` and fills `param`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    /// Node the keyword is given to
    pub node: &'static str,
    /// Keyword argument name
    pub keyword: &'static str,
    /// Node the call is redirected to
    pub target: &'static str,
    /// Path parameter of `target` the keyword fills
    pub param: &'static str,
}

/// A child name that does not follow the dotted-key convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrregularChild {
    /// Parent key (`""` is the root)
    pub parent: &'static str,
    /// Child name as written by callers
    pub name: &'static str,
    /// Key of the node it resolves to
    pub target: &'static str,
}

const fn get(key: &'static str, template: &'static str, params: &'static [&'static str]) -> EndpointSpec {
    EndpointSpec {
        key,
        template,
        params,
        query_positional: &[],
        paginated: false,
        method: Method::Get,
        normalize: false,
    }
}

const fn list(key: &'static str, template: &'static str, params: &'static [&'static str]) -> EndpointSpec {
    EndpointSpec {
        paginated: true,
        ..get(key, template, params)
    }
}

const fn with_query(spec: EndpointSpec, query_positional: &'static [&'static str]) -> EndpointSpec {
    EndpointSpec {
        query_positional,
        ..spec
    }
}

const ID: &[&str] = &["id"];
const CODE_NUMBER: &[&str] = &["code", "number"];

/// Every endpoint node.
pub static ENDPOINTS: &[EndpointSpec] = &[
    // sets
    list("sets", "sets", &[]),
    get("sets.code", "sets/{code}", &["code"]),
    get("sets.id", "sets/{id}", ID),
    get("sets.tcgplayer", "sets/tcgplayer/{id}", ID),
    // cards
    get("cards", "cards/{id}", ID),
    get("cards.id", "cards/{id}", ID),
    list("cards.id.rulings", "cards/{id}/rulings", ID),
    with_query(list("cards.search", "cards/search", &[]), &["q"]),
    get("cards.named", "cards/named", &[]),
    with_query(get("cards.autocomplete", "cards/autocomplete", &[]), &["q"]),
    get("cards.random", "cards/random", &[]),
    EndpointSpec {
        method: Method::Post,
        ..list("cards.collection", "cards/collection", &[])
    },
    get("cards.code", "cards/{code}/{number}", CODE_NUMBER),
    get("cards.code.lang", "cards/{code}/{number}/{lang}", &["code", "number", "lang"]),
    list("cards.code.rulings", "cards/{code}/{number}/rulings", CODE_NUMBER),
    list("cards.oracle", "cards/oracle/{id}", ID),
    get("cards.multiverse", "cards/multiverse/{id}", ID),
    list("cards.multiverse.rulings", "cards/multiverse/{id}/rulings", ID),
    get("cards.mtgo", "cards/mtgo/{id}", ID),
    list("cards.mtgo.rulings", "cards/mtgo/{id}/rulings", ID),
    get("cards.arena", "cards/arena/{id}", ID),
    list("cards.arena.rulings", "cards/arena/{id}/rulings", ID),
    get("cards.tcgplayer", "cards/tcgplayer/{id}", ID),
    list("cards.tcgplayer.rulings", "cards/tcgplayer/{id}/rulings", ID),
    get("cards.cardmarket", "cards/cardmarket/{id}", ID),
    list("cards.cardmarket.rulings", "cards/cardmarket/{id}/rulings", ID),
    // symbology
    list("symbology", "symbology", &[]),
    with_query(get("symbology.parse_mana", "symbology/parse-mana", &[]), &["cost"]),
    // catalog
    EndpointSpec {
        normalize: true,
        ..list("catalog", "catalog/{name}", &["name"])
    },
    list("catalog.card_names", "catalog/card-names", &[]),
    list("catalog.artist_names", "catalog/artist-names", &[]),
    list("catalog.word_bank", "catalog/word-bank", &[]),
    list("catalog.creature_types", "catalog/creature-types", &[]),
    list("catalog.planeswalker_types", "catalog/planeswalker-types", &[]),
    list("catalog.land_types", "catalog/land-types", &[]),
    list("catalog.artifact_types", "catalog/artifact-types", &[]),
    list("catalog.enchantment_types", "catalog/enchantment-types", &[]),
    list("catalog.spell_types", "catalog/spell-types", &[]),
    list("catalog.powers", "catalog/powers", &[]),
    list("catalog.toughnesses", "catalog/toughnesses", &[]),
    list("catalog.loyalties", "catalog/loyalties", &[]),
    list("catalog.watermarks", "catalog/watermarks", &[]),
    list("catalog.keyword_abilities", "catalog/keyword-abilities", &[]),
    list("catalog.keyword_actions", "catalog/keyword-actions", &[]),
    list("catalog.ability_words", "catalog/ability-words", &[]),
    list("catalog.supertypes", "catalog/supertypes", &[]),
    // bulk data
    list("bulk_data", "bulk-data", &[]),
    get("bulk_data.id", "bulk-data/{id}", ID),
    get("bulk_data.type", "bulk-data/{type}", &["type"]),
];

/// Keyword arguments that are really path parameters of another node.
pub static ALIASES: &[Alias] = &[
    Alias { node: "sets", keyword: "code", target: "sets.code", param: "code" },
    Alias { node: "sets", keyword: "id", target: "sets.id", param: "id" },
    Alias { node: "sets", keyword: "tcgplayer_id", target: "sets.tcgplayer", param: "id" },
    Alias { node: "cards", keyword: "id", target: "cards.id", param: "id" },
    Alias { node: "cards.code", keyword: "lang", target: "cards.code.lang", param: "lang" },
    Alias { node: "bulk_data", keyword: "id", target: "bulk_data.id", param: "id" },
    Alias { node: "bulk_data", keyword: "type", target: "bulk_data.type", param: "type" },
    Alias { node: "bulk_data", keyword: "type_", target: "bulk_data.type", param: "type" },
];

/// Child names kept for compatibility with established spellings.
pub static IRREGULAR_CHILDREN: &[IrregularChild] = &[
    // No dot between `catalog` and `supertypes`: an established root-level
    // spelling, resolved exactly like `catalog.supertypes`.
    IrregularChild { parent: "", name: "catalog_supertypes", target: "catalog.supertypes" },
    IrregularChild { parent: "symbology", name: "parsemana", target: "symbology.parse_mana" },
];

/// Find a node by key.
pub fn lookup(key: &str) -> Option<&'static EndpointSpec> {
    ENDPOINTS.iter().find(|spec| spec.key == key)
}

/// First alias of `node` whose keyword satisfies `present`.
pub fn alias_for(node: &str, present: impl Fn(&str) -> bool) -> Option<&'static Alias> {
    ALIASES
        .iter()
        .find(|alias| alias.node == node && present(alias.keyword))
}

/// Key of the child `name` under `parent` (`""` for the root), if any.
pub fn child_key(parent: &str, name: &str) -> Option<&'static str> {
    if let Some(irregular) = IRREGULAR_CHILDREN
        .iter()
        .find(|c| c.parent == parent && c.name == name)
    {
        return Some(irregular.target);
    }

    ENDPOINTS
        .iter()
        .find(|spec| match spec.key.rsplit_once('.') {
            Some((p, n)) => p == parent && n == name,
            None => parent.is_empty() && spec.key == name,
        })
        .map(|spec| spec.key)
}

/// Names of the direct children of `parent`.
pub fn children(parent: &str) -> Vec<&'static str> {
    let regular = ENDPOINTS.iter().filter_map(|spec| match spec.key.rsplit_once('.') {
        Some((p, n)) if p == parent => Some(n),
        None if parent.is_empty() => Some(spec.key),
        _ => None,
    });
    let irregular = IRREGULAR_CHILDREN
        .iter()
        .filter(|c| c.parent == parent)
        .map(|c| c.name);
    regular.chain(irregular).collect()
}
