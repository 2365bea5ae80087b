//! Survey schema registry
//!
//! The fixed, ordered list of survey fields. This order is the column order
//! of every export and the key order of every stored document, so the
//! submission path and the export path must both read it from here.

/// One survey question: internal identifier and the header text used in exports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub id: &'static str,
    pub label: &'static str,
}

const fn field(id: &'static str, label: &'static str) -> FieldDef {
    FieldDef { id, label }
}

/// Identifier of the server-generated submission timestamp field
pub const CREATED_AT: &str = "created_at";

/// All survey fields in canonical order
pub const FIELDS: &[FieldDef] = &[
    field(CREATED_AT, "Submission time"),
    field(
        "purchaseTriggers",
        "Think about the last tech product you purchased. What triggered your decision to buy it?",
    ),
    field("purchaseTriggersOther", "Purchase triggers: Other (please specify)"),
    field("purchaseDescription", "Would you describe this purchase as:"),
    field(
        "initialBrands",
        "Which tech brands or products did you initially consider when deciding what to buy?",
    ),
    field("initialBrandsOther", "Initial consideration brands: Other (please specify)"),
    field("initialReasons", "Why did these brands come to mind first?"),
    field("initialReasonsOther", "Initial consideration reasons: Other (please specify)"),
    field(
        "brandsNotConsidered",
        "Were there any tech brands you did not consider? Why do you think that was?",
    ),
    field(
        "evaluationMethods",
        "How did you evaluate or compare the different tech products before making a decision?",
    ),
    field("infoSources", "What information sources did you consult during your decision process?"),
    field("infoSourcesOther", "Information sources: Other (please specify)"),
    field(
        "strongestInfluence",
        "Which of these sources had the strongest influence on your final decision, and why?",
    ),
    field(
        "expandedConsideration",
        "During your research, did you start considering any tech brands or products that you hadn’t thought of initially?",
    ),
    field(
        "expandedConsiderationRepeat",
        "During your research, did you start considering any tech brands or products that you hadn’t thought of initially? (repeat)",
    ),
    field(
        "expansionReasons",
        "If yes, what caused you to add these options to your consideration set?",
    ),
    field("expansionReasonsOther", "Expansion reasons: Other (please specify)"),
    field(
        "expansionReasonsRepeat",
        "If yes, what caused you to add these options to your consideration set? (repeat)",
    ),
    field(
        "expansionReasonsRepeatOther",
        "Expansion reasons repeat: Other (please specify)",
    ),
    field(
        "purchaseDrivers",
        "What ultimately made you choose the specific tech product you bought?",
    ),
    field("purchaseDriversOther", "Purchase drivers: Other (please specify)"),
    field("purchaseChannel", "Where did you purchase the product?"),
    field("channelReasons", "Why did you choose that retailer or platform?"),
    field("channelReasonsOther", "Channel reasons: Other (please specify)"),
    field(
        "postPurchaseActions",
        "After purchasing the tech product, did you do any of the following?",
    ),
    field(
        "postPurchaseMotivation",
        "What motivated you to engage (or not engage) in these behaviours?",
    ),
    field(
        "advocacyLikelihood",
        "How likely are you to actively recommend this tech brand to others? (1-5)",
    ),
    field(
        "advocacyMotivation",
        "What would make you more likely to recommend this brand in the future?",
    ),
    field(
        "repurchaseLikelihood",
        "When buying a similar tech product in the future, how likely are you to choose the same brand?",
    ),
    field(
        "switchFactors",
        "What factors would most likely cause you to switch to a different tech brand next time?",
    ),
];

/// Field identifiers in canonical order
pub fn field_ids() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|f| f.id)
}

/// Field labels in canonical order
pub fn labels() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|f| f.label)
}

/// Look up the label for a field identifier
pub fn label_for(id: &str) -> Option<&'static str> {
    FIELDS.iter().find(|f| f.id == id).map(|f| f.label)
}

/// Look up the field identifier for a label (reverse mapping for label-keyed documents)
pub fn id_for_label(label: &str) -> Option<&'static str> {
    FIELDS.iter().find(|f| f.label == label).map(|f| f.id)
}
