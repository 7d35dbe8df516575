//! Lowering of pipeline steps to operator instances.

use tidyshape_operators::separate::Separator;
use tidyshape_operators::{
    Coercion, Complete, DropNa, Expand, Fill, Gather, Operator, ReplaceNa, Separate, Spread, Unite,
};

use crate::dsl::yaml::Step;

/// Instantiate the operator for one step. `coercion` is handed to every
/// operator that can convert column types.
pub fn lower(step: &Step, coercion: &Coercion) -> Box<dyn Operator> {
    match step.clone() {
        Step::Gather {
            columns,
            key,
            value,
            drop_missing,
            convert,
            convert_key,
        } => Box::new(
            Gather::new(columns, key, value)
                .drop_missing(drop_missing)
                .convert(convert)
                .convert_key(convert_key)
                .with_coercion(coercion.clone()),
        ),
        Step::Spread {
            key,
            value,
            fill,
            convert,
            sep,
        } => {
            let mut op = Spread::new(key, value)
                .convert(convert)
                .with_coercion(coercion.clone());
            op.fill = fill;
            op.sep = sep;
            Box::new(op)
        }
        Step::Separate {
            column,
            into,
            sep,
            positions,
            remove,
            convert,
            extra,
            fill,
        } => {
            let mut op = Separate::new(column, into)
                .remove(remove)
                .convert(convert)
                .extra(extra)
                .fill(fill)
                .with_coercion(coercion.clone());
            op.sep = match (sep, positions) {
                (_, Some(ps)) => Separator::Positions(ps),
                (Some(p), None) => Separator::Pattern(p),
                (None, None) => Separator::default(),
            };
            Box::new(op)
        }
        Step::Unite {
            name,
            columns,
            sep,
            remove,
            missing_as_na,
        } => Box::new(
            Unite::new(name, columns)
                .sep(sep)
                .remove(remove)
                .missing_as_na(missing_as_na),
        ),
        Step::Complete {
            columns,
            fill,
            explicit,
        } => {
            let mut op = Complete::new(columns).explicit(explicit);
            op.fill = fill;
            Box::new(op)
        }
        Step::Expand { columns } => Box::new(Expand::new(columns)),
        Step::Fill { columns, direction } => Box::new(Fill::new(columns).direction(direction)),
        Step::DropNa { columns } => Box::new(DropNa::new(columns)),
        Step::ReplaceNa { values } => Box::new(ReplaceNa { values }),
    }
}

pub fn lower_pipeline(steps: &[Step], coercion: &Coercion) -> Vec<Box<dyn Operator>> {
    steps.iter().map(|s| lower(s, coercion)).collect()
}
