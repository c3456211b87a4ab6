//! Node kinds and cross-reference properties — the reflection table of the
//! data-model language.

use std::fmt;

/// Kind of an AST node.
///
/// The three `*Attribute` kinds that end in `NodeAttribute`/`ObjectAttribute`
/// are derived attributes: clones synthesized under a node that views an
/// entity. They are subtypes of [`NodeKind::LogicalAttribute`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    /// Document root. Never carries an id.
    Root,
    DataModel,
    DataModelDependency,
    LogicalEntity,
    LogicalAttribute,
    Relationship,
    RelationshipAttribute,
    SystemDiagram,
    LogicalEntityNode,
    LogicalEntityNodeAttribute,
    RelationshipEdge,
    InheritanceEdge,
    Mapping,
    SourceObject,
    SourceObjectAttribute,
    SourceObjectDependency,
    JoinCondition,
    SourceObjectAttributeReference,
    TargetObject,
    TargetObjectAttribute,
    AttributeMapping,
    AttributeMappingSource,
    AttributeMappingTarget,
}

impl NodeKind {
    /// Whether nodes of this kind carry an `id` property.
    pub fn is_identified(self) -> bool {
        matches!(
            self,
            NodeKind::DataModel
                | NodeKind::LogicalEntity
                | NodeKind::LogicalAttribute
                | NodeKind::Relationship
                | NodeKind::SystemDiagram
                | NodeKind::LogicalEntityNode
                | NodeKind::LogicalEntityNodeAttribute
                | NodeKind::RelationshipEdge
                | NodeKind::InheritanceEdge
                | NodeKind::Mapping
                | NodeKind::SourceObject
                | NodeKind::SourceObjectAttribute
                | NodeKind::TargetObjectAttribute
        )
    }

    /// Whether this kind is a synthesized clone of an entity attribute.
    pub fn is_derived_attribute(self) -> bool {
        matches!(
            self,
            NodeKind::LogicalEntityNodeAttribute
                | NodeKind::SourceObjectAttribute
                | NodeKind::TargetObjectAttribute
        )
    }

    /// Whether this kind views a `LogicalEntity` and therefore owns derived
    /// attributes.
    pub fn is_entity_view(self) -> bool {
        self.derived_attribute_kind().is_some()
    }

    /// The derived attribute kind created under a viewing node of this kind.
    pub fn derived_attribute_kind(self) -> Option<NodeKind> {
        match self {
            NodeKind::LogicalEntityNode => Some(NodeKind::LogicalEntityNodeAttribute),
            NodeKind::SourceObject => Some(NodeKind::SourceObjectAttribute),
            NodeKind::TargetObject => Some(NodeKind::TargetObjectAttribute),
            _ => None,
        }
    }

    /// `self` can be used where `other` is expected.
    pub fn is_subtype_of(self, other: NodeKind) -> bool {
        self == other || (other == NodeKind::LogicalAttribute && self.is_derived_attribute())
    }

    /// Declared target kind of a cross-reference `property` on this kind.
    ///
    /// Returns `None` when the kind has no such reference property.
    pub fn reference_target(self, property: Property) -> Option<NodeKind> {
        use NodeKind as K;
        use Property as P;
        let target = match (self, property) {
            (K::DataModelDependency, P::DataModel) => K::DataModel,
            (K::LogicalEntity, P::SuperEntities) => K::LogicalEntity,
            (K::Relationship, P::Parent | P::Child) => K::LogicalEntity,
            (K::RelationshipAttribute, P::Parent | P::Child) => K::LogicalAttribute,
            (K::LogicalEntityNode, P::Entity) => K::LogicalEntity,
            (K::RelationshipEdge, P::Relationship) => K::Relationship,
            (K::RelationshipEdge, P::SourceNode | P::TargetNode) => K::LogicalEntityNode,
            (K::InheritanceEdge, P::BaseNode | P::SuperNode) => K::LogicalEntityNode,
            (K::SourceObject, P::Entity) => K::LogicalEntity,
            (K::SourceObjectDependency, P::Source) => K::SourceObject,
            (K::SourceObjectAttributeReference, P::Value) => K::SourceObjectAttribute,
            (K::TargetObject, P::Entity) => K::LogicalEntity,
            (K::AttributeMapping, P::Expression) => K::SourceObjectAttribute,
            (K::AttributeMappingSource, P::Value) => K::SourceObjectAttribute,
            (K::AttributeMappingTarget, P::Value) => K::TargetObjectAttribute,
            _ => return None,
        };
        Some(target)
    }

    /// Human readable kind name.
    pub fn display(self) -> &'static str {
        match self {
            NodeKind::Root => "Root",
            NodeKind::DataModel => "DataModel",
            NodeKind::DataModelDependency => "DataModelDependency",
            NodeKind::LogicalEntity => "LogicalEntity",
            NodeKind::LogicalAttribute => "LogicalAttribute",
            NodeKind::Relationship => "Relationship",
            NodeKind::RelationshipAttribute => "RelationshipAttribute",
            NodeKind::SystemDiagram => "SystemDiagram",
            NodeKind::LogicalEntityNode => "LogicalEntityNode",
            NodeKind::LogicalEntityNodeAttribute => "LogicalEntityNodeAttribute",
            NodeKind::RelationshipEdge => "RelationshipEdge",
            NodeKind::InheritanceEdge => "InheritanceEdge",
            NodeKind::Mapping => "Mapping",
            NodeKind::SourceObject => "SourceObject",
            NodeKind::SourceObjectAttribute => "SourceObjectAttribute",
            NodeKind::SourceObjectDependency => "SourceObjectDependency",
            NodeKind::JoinCondition => "JoinCondition",
            NodeKind::SourceObjectAttributeReference => "SourceObjectAttributeReference",
            NodeKind::TargetObject => "TargetObject",
            NodeKind::TargetObjectAttribute => "TargetObjectAttribute",
            NodeKind::AttributeMapping => "AttributeMapping",
            NodeKind::AttributeMappingSource => "AttributeMappingSource",
            NodeKind::AttributeMappingTarget => "AttributeMappingTarget",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// Name of a cross-reference property on a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// `LogicalEntityNode.entity`, `SourceObject.entity`, `TargetObject.entity`
    Entity,
    /// `Relationship.parent`, `RelationshipAttribute.parent`
    Parent,
    /// `Relationship.child`, `RelationshipAttribute.child`
    Child,
    /// `RelationshipEdge.relationship`
    Relationship,
    SourceNode,
    TargetNode,
    BaseNode,
    SuperNode,
    /// `SourceObjectDependency.source`
    Source,
    /// Attribute references inside mappings and join conditions
    Value,
    /// `DataModelDependency.datamodel`
    DataModel,
    SuperEntities,
    /// Placeholder bindings inside an attribute mapping expression
    Expression,
}

impl Property {
    pub fn as_str(self) -> &'static str {
        match self {
            Property::Entity => "entity",
            Property::Parent => "parent",
            Property::Child => "child",
            Property::Relationship => "relationship",
            Property::SourceNode => "sourceNode",
            Property::TargetNode => "targetNode",
            Property::BaseNode => "baseNode",
            Property::SuperNode => "superNode",
            Property::Source => "source",
            Property::Value => "value",
            Property::DataModel => "datamodel",
            Property::SuperEntities => "superEntities",
            Property::Expression => "expression",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
