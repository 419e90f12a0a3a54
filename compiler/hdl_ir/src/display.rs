//! Source-text rendering of annotations and expressions.
//!
//! Diagnostics name the offending construct by its textual form, so the
//! renderer stays close to surface syntax rather than to the tree shape.

use std::fmt::Write;

use crate::{ExprId, ExprKind, ImportPath, Module, TypeAnnotation, TypeDefinition};

impl Module {
    /// Render a type annotation as source text.
    pub fn annotation_text(&self, ty: &TypeAnnotation) -> String {
        let mut out = String::new();
        self.write_annotation(&mut out, ty);
        out
    }

    /// Render an expression as source text.
    pub fn expr_text(&self, id: ExprId) -> String {
        let mut out = String::new();
        self.write_expr(&mut out, id);
        out
    }

    /// Render an import path (`std::float32`).
    pub fn import_path_text(&self, path: &ImportPath) -> String {
        path.segments()
            .iter()
            .map(|segment| self.text(*segment))
            .collect::<Vec<_>>()
            .join("::")
    }

    /// Name of the definition a type reference points at.
    pub fn type_definition_text(&self, def: &TypeDefinition) -> String {
        match def {
            TypeDefinition::Alias(id) | TypeDefinition::Struct(id) | TypeDefinition::Enum(id) => {
                self.item(*id)
                    .map_or_else(|| format!("<{id:?}>"), |item| self.text(item.name()).to_owned())
            }
            TypeDefinition::Imported(mod_ref) => {
                format!("{}::{}", self.text(mod_ref.import), self.text(mod_ref.attr))
            }
        }
    }

    fn write_annotation(&self, out: &mut String, ty: &TypeAnnotation) {
        match ty {
            TypeAnnotation::Builtin(b) => out.push_str(&b.keyword()),
            TypeAnnotation::Tuple { members, .. } => {
                out.push('(');
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_annotation(out, member);
                }
                out.push(')');
            }
            TypeAnnotation::Array { element, dim, .. } => {
                self.write_annotation(out, element);
                out.push('[');
                self.write_expr(out, *dim);
                out.push(']');
            }
            TypeAnnotation::TypeRef {
                type_ref,
                parametrics,
                ..
            } => {
                out.push_str(self.text(type_ref.text));
                if !parametrics.is_empty() {
                    out.push('[');
                    self.write_list(out, parametrics);
                    out.push(']');
                }
            }
            TypeAnnotation::Channel {
                payload, direction, ..
            } => {
                out.push_str("chan<");
                self.write_annotation(out, payload);
                out.push('>');
                out.push_str(match direction {
                    crate::ChannelDirection::In => " in",
                    crate::ChannelDirection::Out => " out",
                });
            }
        }
    }

    fn write_list(&self, out: &mut String, exprs: &[ExprId]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_expr(out, *expr);
        }
    }

    fn write_expr(&self, out: &mut String, id: ExprId) {
        let Some(expr) = self.expr(id) else {
            let _ = write!(out, "<{id:?}>");
            return;
        };
        match &expr.kind {
            ExprKind::Number { value, ty } => {
                if let Some(ty) = ty {
                    self.write_annotation(out, ty);
                    out.push(':');
                }
                let _ = write!(out, "{value}");
            }
            ExprKind::NameRef(name) | ExprKind::ConstRef(name) => out.push_str(self.text(*name)),
            ExprKind::EnumRef { enum_def, attr } => {
                out.push_str(&self.type_definition_text(enum_def));
                out.push_str("::");
                out.push_str(self.text(*attr));
            }
            ExprKind::Invocation { callee, args } => {
                self.write_expr(out, *callee);
                out.push('(');
                self.write_list(out, args);
                out.push(')');
            }
            ExprKind::Binary { op, lhs, rhs } => {
                self.write_expr(out, *lhs);
                let _ = write!(out, " {} ", op.as_symbol());
                self.write_expr(out, *rhs);
            }
            ExprKind::Tuple(members) => {
                out.push('(');
                self.write_list(out, members);
                if members.len() == 1 {
                    out.push(',');
                }
                out.push(')');
            }
            ExprKind::Index { lhs, rhs } => {
                self.write_expr(out, *lhs);
                out.push('[');
                self.write_expr(out, *rhs);
                out.push(']');
            }
            ExprKind::Slice { start, limit } => {
                if let Some(start) = start {
                    self.write_expr(out, *start);
                }
                out.push(':');
                if let Some(limit) = limit {
                    self.write_expr(out, *limit);
                }
            }
            ExprKind::Cast { expr, ty } => {
                self.write_expr(out, *expr);
                out.push_str(" as ");
                self.write_annotation(out, ty);
            }
        }
    }
}
