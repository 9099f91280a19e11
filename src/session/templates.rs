/// Sample questions offered in the composer side panel, per user category
const AGRICULTOR: &[&str] = &[
    "¿Cuál es la mejor época para sembrar [nombre del cultivo] en [ubicación]?",
    "¿Qué tipo de suelo es ideal para [nombre del cultivo]?",
    "¿Cada cuánto debería regar mis plantas?",
    "Dime la humedad de mi cultivo AGRO-XXX-Y",
    "¿Qué pH tiene el suelo de mi cultivo AGRO-XXX-Y?",
    "Dame la temperatura de mi cultivo AGRO-XXX-Y",
    "¿Cuáles son los niveles de nutrientes de mi cultivo AGRO-XXX-Y?",
    "¿Qué datos de ubicación tiene mi cultivo AGRO-XXX-Y?",
];

const AGRONOMO: &[&str] = &[
    "¿Cuáles son los principales problemas de un cultivo de [nombre]?",
    "¿Cómo afecta la temperatura o humedad al crecimiento?",
    "Dame los datos de mi cultivo AGRO-XXX-Y",
    "Necesito la información de sensores del cultivo AGRO-XXX-Y",
    "¿Cuál es la latitud y longitud del cultivo AGRO-XXX-Y?",
];

const ADMIN: &[&str] = &[
    "¿Qué datos tengo sobre los cultivos?",
    "¿Cuáles son los sensores disponibles?",
];

pub const DEFAULT_USER_TYPE: &str = "agricultor";

/// Templates resolved for the signed-in user
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSet {
    pub user_type: String,
    pub questions: Vec<String>,
}

impl TemplateSet {
    /// `None` (lookup failed or no session) means the default category.
    /// A category without templates yields an empty set.
    pub fn for_user_type(user_type: Option<&str>) -> Self {
        let user_type = user_type
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_TYPE.to_string());

        let questions = match user_type.as_str() {
            "agricultor" => AGRICULTOR,
            "agronomo" => AGRONOMO,
            "admin" => ADMIN,
            _ => &[],
        };

        Self {
            user_type,
            questions: questions.iter().map(|q| q.to_string()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.questions.get(index).map(String::as_str)
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::for_user_type(None)
    }
}
