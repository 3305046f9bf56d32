//! IR node model.
//!
//! Every struct here is a plain value with builder-style setters. Containers
//! (`Group`, `Reference`, `DocGroup`) own their operands, so a finished tree is
//! a single owned value with no sharing.

use serde::Serialize;

use crate::boundary::{Boundary, Distance};

/// Comparison applied by a [`Term`] or [`Doc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Match {
    Eq,
    Ne,
    Lt,
    Gt,
    Leq,
    Geq,
    Contains,
    Containsnot,
}

impl Match {
    /// Logical complement, used by negation parity.
    pub fn negated(self) -> Self {
        match self {
            Self::Eq => Self::Ne,
            Self::Ne => Self::Eq,
            Self::Lt => Self::Geq,
            Self::Geq => Self::Lt,
            Self::Gt => Self::Leq,
            Self::Leq => Self::Gt,
            Self::Contains => Self::Containsnot,
            Self::Containsnot => Self::Contains,
        }
    }

    /// Applies `negations` flips; only the parity matters.
    pub fn with_parity(self, negations: usize) -> Self {
        if negations % 2 == 1 {
            self.negated()
        } else {
            self
        }
    }

    /// Whether the comparison is meaningful for plain strings.
    pub fn is_string_operator(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Contains | Self::Containsnot
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Leq => "<=",
            Self::Geq => ">=",
            Self::Contains => "~",
            Self::Containsnot => "!~",
        }
    }
}

/// Interpretation of a term or doc value other than a literal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TermType {
    Regex,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolRelation {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Sequence,
    Relation,
    Position,
    Disjunction,
    Class,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceOperation {
    Focus,
}

/// Positional relationship between the two operands of a `position` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Frame {
    Matches,
    IsAround,
    StartsWith,
    EndsWith,
    OverlapsLeft,
    OverlapsRight,
}

impl Frame {
    pub fn name(self) -> &'static str {
        match self {
            Self::Matches => "matches",
            Self::IsAround => "isAround",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::OverlapsLeft => "overlapsLeft",
            Self::OverlapsRight => "overlapsRight",
        }
    }
}

/// Atomic constraint on a single annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foundry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_op: Option<Match>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub term_type: Option<TermType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arity: Option<Boundary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenarity: Option<Boundary>,
}

impl Term {
    pub fn new() -> Self {
        Self::default()
    }

    /// `layer=key` with `match:eq`.
    pub fn key_eq(layer: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new().layer(layer).key(key).matching(Match::Eq)
    }

    pub fn foundry(mut self, foundry: impl Into<String>) -> Self {
        self.foundry = Some(foundry.into());
        self
    }

    pub fn maybe_foundry(mut self, foundry: Option<impl Into<String>>) -> Self {
        self.foundry = foundry.map(Into::into);
        self
    }

    pub fn layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn matching(mut self, match_op: Match) -> Self {
        self.match_op = Some(match_op);
        self
    }

    pub fn typed(mut self, term_type: TermType) -> Self {
        self.term_type = Some(term_type);
        self
    }

    pub fn case_insensitive(mut self, value: bool) -> Self {
        self.case_insensitive = Some(value);
        self
    }

    pub fn root(mut self) -> Self {
        self.root = Some(true);
        self
    }

    pub fn arity(mut self, boundary: Boundary) -> Self {
        self.arity = Some(boundary);
        self
    }

    pub fn tokenarity(mut self, boundary: Boundary) -> Self {
        self.tokenarity = Some(boundary);
        self
    }

    /// Flips `match` according to negation parity. Terms without a match
    /// are treated as `eq`.
    pub fn negate_by(mut self, negations: usize) -> Self {
        if negations % 2 == 1 {
            let current = self.match_op.unwrap_or(Match::Eq);
            self.match_op = Some(current.negated());
        }
        self
    }
}

/// Boolean combination of terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermGroup {
    pub relation: BoolRelation,
    pub operands: Vec<TermExpr>,
}

impl TermGroup {
    pub fn new(relation: BoolRelation) -> Self {
        Self {
            relation,
            operands: Vec::new(),
        }
    }

    pub fn with_operands(relation: BoolRelation, operands: Vec<TermExpr>) -> Self {
        Self { relation, operands }
    }

    pub fn push(&mut self, operand: impl Into<TermExpr>) {
        self.operands.push(operand.into());
    }
}

/// Anything that can sit in a `wrap` or `attr` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub enum TermExpr {
    Term(Term),
    TermGroup(TermGroup),
}

impl TermExpr {
    /// Combines `self` with `other` under `and`, extending an existing
    /// `and` group instead of nesting.
    pub fn and(self, other: impl Into<TermExpr>) -> Self {
        match self {
            TermExpr::TermGroup(mut group) if group.relation == BoolRelation::And => {
                group.push(other);
                TermExpr::TermGroup(group)
            }
            first => TermExpr::TermGroup(TermGroup::with_operands(
                BoolRelation::And,
                vec![first, other.into()],
            )),
        }
    }

    pub fn as_term(&self) -> Option<&Term> {
        match self {
            TermExpr::Term(term) => Some(term),
            TermExpr::TermGroup(_) => None,
        }
    }
}

impl From<Term> for TermExpr {
    fn from(term: Term) -> Self {
        TermExpr::Term(term)
    }
}

impl From<TermGroup> for TermExpr {
    fn from(group: TermGroup) -> Self {
        TermExpr::TermGroup(group)
    }
}

/// Single corpus position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<TermExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attr: Option<TermExpr>,
}

impl Token {
    /// Any token.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wrapping(wrap: impl Into<TermExpr>) -> Self {
        Self {
            wrap: Some(wrap.into()),
            attr: None,
        }
    }
}

/// Structural annotation region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foundry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_op: Option<Match>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attr: Option<TermExpr>,
}

impl Span {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn foundry(mut self, foundry: impl Into<String>) -> Self {
        self.foundry = Some(foundry.into());
        self
    }

    pub fn maybe_foundry(mut self, foundry: Option<impl Into<String>>) -> Self {
        self.foundry = foundry.map(Into::into);
        self
    }

    pub fn layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn matching(mut self, match_op: Match) -> Self {
        self.match_op = Some(match_op);
        self
    }
}

/// Label and optional range of a binary relation edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@type", rename = "relation")]
pub struct Relation {
    pub wrap: TermExpr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary: Option<Boundary>,
}

impl Relation {
    pub fn new(wrap: impl Into<TermExpr>) -> Self {
        Self {
            wrap: wrap.into(),
            boundary: None,
        }
    }

    pub fn bounded(mut self, boundary: Option<Boundary>) -> Self {
        self.boundary = boundary;
        self
    }
}

/// Generic n-ary combinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub operation: Operation,
    pub operands: Vec<IrNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_order: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Frame>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub distances: Vec<Distance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_out: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<Relation>,
}

impl Group {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            operands: Vec::new(),
            in_order: None,
            frames: Vec::new(),
            distances: Vec::new(),
            class_out: None,
            relation: None,
        }
    }

    pub fn sequence() -> Self {
        Self::new(Operation::Sequence)
    }

    pub fn disjunction() -> Self {
        Self::new(Operation::Disjunction)
    }

    pub fn relation(relation: Relation) -> Self {
        let mut group = Self::new(Operation::Relation);
        group.relation = Some(relation);
        group
    }

    pub fn position(frames: Vec<Frame>) -> Self {
        let mut group = Self::new(Operation::Position);
        group.frames = frames;
        group
    }

    /// `{class: operand}`.
    pub fn class(class: u32, operand: impl Into<IrNode>) -> Self {
        let mut group = Self::new(Operation::Class);
        group.class_out = Some(class);
        group.operands.push(operand.into());
        group
    }

    pub fn in_order(mut self, value: bool) -> Self {
        self.in_order = Some(value);
        self
    }

    pub fn distance(mut self, distance: Distance) -> Self {
        self.distances.push(distance);
        self
    }

    pub fn operand(mut self, operand: impl Into<IrNode>) -> Self {
        self.operands.push(operand.into());
        self
    }
}

/// Re-exposes a previously class-wrapped sub-structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub operation: ReferenceOperation,
    pub class_ref: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<IrNode>,
}

impl Reference {
    pub fn focus(class: u32) -> Self {
        Self {
            operation: ReferenceOperation::Focus,
            class_ref: vec![class],
            operands: Vec::new(),
        }
    }

    pub fn operand(mut self, operand: impl Into<IrNode>) -> Self {
        self.operands.push(operand.into());
        self
    }
}

/// Metadata filter leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Doc {
    pub key: String,
    pub value: String,
    #[serde(rename = "match")]
    pub match_op: Match,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<TermType>,
}

impl Doc {
    pub fn new(key: impl Into<String>, value: impl Into<String>, match_op: Match) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            match_op,
            value_type: None,
        }
    }

    pub fn typed(mut self, value_type: Option<TermType>) -> Self {
        self.value_type = value_type;
        self
    }
}

/// Boolean combination of metadata filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocGroup {
    pub relation: BoolRelation,
    pub operands: Vec<IrNode>,
}

impl DocGroup {
    pub fn new(relation: BoolRelation) -> Self {
        Self {
            relation,
            operands: Vec::new(),
        }
    }
}

/// Any node that may appear as an operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub enum IrNode {
    Token(Token),
    Span(Span),
    Group(Group),
    Reference(Reference),
    Doc(Doc),
    DocGroup(DocGroup),
}

impl IrNode {
    /// Operand list of a container node; `None` for leaves.
    pub fn operands_mut(&mut self) -> Option<&mut Vec<IrNode>> {
        match self {
            IrNode::Group(group) => Some(&mut group.operands),
            IrNode::Reference(reference) => Some(&mut reference.operands),
            IrNode::DocGroup(group) => Some(&mut group.operands),
            IrNode::Token(_) | IrNode::Span(_) | IrNode::Doc(_) => None,
        }
    }

    pub fn operands(&self) -> &[IrNode] {
        match self {
            IrNode::Group(group) => &group.operands,
            IrNode::Reference(reference) => &reference.operands,
            IrNode::DocGroup(group) => &group.operands,
            IrNode::Token(_) | IrNode::Span(_) | IrNode::Doc(_) => &[],
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self,
            IrNode::Group(_) | IrNode::Reference(_) | IrNode::DocGroup(_)
        )
    }

    /// Tag name as serialized under `@type`.
    pub fn type_name(&self) -> &'static str {
        match self {
            IrNode::Token(_) => "token",
            IrNode::Span(_) => "span",
            IrNode::Group(_) => "group",
            IrNode::Reference(_) => "reference",
            IrNode::Doc(_) => "doc",
            IrNode::DocGroup(_) => "docGroup",
        }
    }

    /// Slot for unary attribute terms (`Span` and `Token` only).
    pub fn attr_mut(&mut self) -> Option<&mut Option<TermExpr>> {
        match self {
            IrNode::Token(token) => Some(&mut token.attr),
            IrNode::Span(span) => Some(&mut span.attr),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<Token> for IrNode {
    fn from(token: Token) -> Self {
        IrNode::Token(token)
    }
}

impl From<Span> for IrNode {
    fn from(span: Span) -> Self {
        IrNode::Span(span)
    }
}

impl From<Group> for IrNode {
    fn from(group: Group) -> Self {
        IrNode::Group(group)
    }
}

impl From<Reference> for IrNode {
    fn from(reference: Reference) -> Self {
        IrNode::Reference(reference)
    }
}

impl From<Doc> for IrNode {
    fn from(doc: Doc) -> Self {
        IrNode::Doc(doc)
    }
}

impl From<DocGroup> for IrNode {
    fn from(group: DocGroup) -> Self {
        IrNode::DocGroup(group)
    }
}
