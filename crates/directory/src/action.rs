//! Catalog of directory actions exposed to workflows and agents.
//!
//! Each action maps to one REST endpoint; [`DirectoryClient::execute_action`]
//! turns a parameter map into a request against it.
//!
//! [`DirectoryClient::execute_action`]: crate::DirectoryClient::execute_action

use serde::Serialize;

/// HTTP method of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl ActionMethod {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    String,
    Number,
    Boolean,
    Object,
}

/// One declared parameter of an action.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub name: &'static str,
    pub kind: ParameterKind,
    pub required: bool,
    pub description: &'static str,
}

/// A directory action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Endpoint path; `:name` segments are filled from parameters.
    pub endpoint: &'static str,
    pub method: ActionMethod,
    pub parameters: &'static [Parameter],
    pub workflow_compatible: bool,
    pub agent_compatible: bool,
}

impl Action {
    /// Look up an action by id.
    pub fn find(id: &str) -> Option<&'static Action> {
        ACTIONS.iter().find(|a| a.id == id)
    }
}

const fn param(
    name: &'static str,
    kind: ParameterKind,
    required: bool,
    description: &'static str,
) -> Parameter {
    Parameter {
        name,
        kind,
        required,
        description,
    }
}

const ID_PARAM: Parameter = param("id", ParameterKind::Number, true, "ID de l'entrée");

/// Every known action.
pub static ACTIONS: &[Action] = &[
    Action {
        id: "get_all_entries",
        name: "Obtenir toutes les entrées",
        description: "Récupère toutes les entrées de l'annuaire",
        endpoint: "/api/annuaire",
        method: ActionMethod::Get,
        parameters: &[],
        workflow_compatible: true,
        agent_compatible: true,
    },
    Action {
        id: "search_entries",
        name: "Rechercher des entrées",
        description: "Recherche dans l'annuaire par nom, poste, département, IP, email ou téléphone",
        endpoint: "/api/annuaire",
        method: ActionMethod::Get,
        parameters: &[
            param("query", ParameterKind::String, false, "Terme de recherche"),
            param("departement", ParameterKind::String, false, "Filtrer par département"),
            param("poste", ParameterKind::String, false, "Filtrer par poste/position"),
            param("limit", ParameterKind::Number, false, "Nombre maximum de résultats (défaut: 50)"),
        ],
        workflow_compatible: true,
        agent_compatible: true,
    },
    Action {
        id: "get_entry_by_id",
        name: "Obtenir une entrée par ID",
        description: "Récupère les détails complets d'une entrée spécifique",
        endpoint: "/api/annuaire/:id",
        method: ActionMethod::Get,
        parameters: &[ID_PARAM],
        workflow_compatible: true,
        agent_compatible: true,
    },
    Action {
        id: "create_entry",
        name: "Créer une nouvelle entrée",
        description: "Ajoute une nouvelle entrée dans l'annuaire (admin seulement)",
        endpoint: "/api/annuaire",
        method: ActionMethod::Post,
        parameters: &[
            param("nom", ParameterKind::String, true, "Nom et prénom de la personne"),
            param("ip", ParameterKind::String, false, "Adresse IP de l'appareil"),
            param("poste", ParameterKind::String, true, "Poste/position de la personne"),
            param("departement", ParameterKind::String, true, "Département de la personne"),
            param("email", ParameterKind::String, true, "Adresse email"),
            param("tel", ParameterKind::String, true, "Numéro de téléphone"),
        ],
        workflow_compatible: false,
        agent_compatible: false,
    },
    Action {
        id: "update_entry",
        name: "Modifier une entrée",
        description: "Met à jour une entrée existante (admin seulement)",
        endpoint: "/api/annuaire/:id",
        method: ActionMethod::Put,
        parameters: &[
            ID_PARAM,
            param("nom", ParameterKind::String, false, "Nouveau nom et prénom"),
            param("ip", ParameterKind::String, false, "Nouvelle adresse IP"),
            param("poste", ParameterKind::String, false, "Nouveau poste/position"),
            param("departement", ParameterKind::String, false, "Nouveau département"),
            param("email", ParameterKind::String, false, "Nouvelle adresse email"),
            param("tel", ParameterKind::String, false, "Nouveau numéro de téléphone"),
        ],
        workflow_compatible: false,
        agent_compatible: false,
    },
    Action {
        id: "delete_entry",
        name: "Supprimer une entrée",
        description: "Supprime une entrée de l'annuaire (admin seulement)",
        endpoint: "/api/annuaire/:id",
        method: ActionMethod::Delete,
        parameters: &[ID_PARAM],
        workflow_compatible: false,
        agent_compatible: false,
    },
];

/// Actions usable from workflows.
pub fn workflow_actions() -> impl Iterator<Item = &'static Action> {
    ACTIONS.iter().filter(|a| a.workflow_compatible)
}

/// Actions usable by agents.
pub fn agent_actions() -> impl Iterator<Item = &'static Action> {
    ACTIONS.iter().filter(|a| a.agent_compatible)
}
