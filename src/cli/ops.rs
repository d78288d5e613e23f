//! Cart operations given on the command line.

use std::{num::NonZeroU32, str::FromStr};

use thiserror::Error;

use crate::products::ProductId;

/// Errors parsing a cart operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartOpError {
    /// The operation isn't one of `add`, `set` or `remove`.
    #[error(
        "Unknown cart operation '{0}', expected add:<id>, add:<id>x<qty>, set:<id>=<qty> or remove:<id>"
    )]
    Unknown(String),

    /// A product id or quantity isn't a number, or an added quantity is zero.
    #[error("Invalid number in cart operation '{0}'")]
    InvalidNumber(String),
}

/// A single cart mutation, e.g. `add:1`, `add:1x3`, `set:1=5` or `remove:2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOp {
    /// Add units of a product, one unless a quantity is given.
    Add(ProductId, NonZeroU32),

    /// Replace the quantity of a product already in the cart.
    Set(ProductId, i64),

    /// Remove a product from the cart.
    Remove(ProductId),
}

impl FromStr for CartOp {
    type Err = CartOpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (op, args) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| CartOpError::Unknown(s.to_string()))?;

        let parse_id = |raw: &str| {
            raw.trim()
                .parse::<u64>()
                .map(ProductId::new)
                .map_err(|_err| CartOpError::InvalidNumber(s.to_string()))
        };

        match op {
            "add" => match args.split_once('x') {
                Some((id, quantity)) => {
                    let quantity = quantity
                        .trim()
                        .parse::<NonZeroU32>()
                        .map_err(|_err| CartOpError::InvalidNumber(s.to_string()))?;

                    Ok(CartOp::Add(parse_id(id)?, quantity))
                }
                None => Ok(CartOp::Add(parse_id(args)?, NonZeroU32::MIN)),
            },
            "remove" => Ok(CartOp::Remove(parse_id(args)?)),
            "set" => {
                let (id, quantity) = args
                    .split_once('=')
                    .ok_or_else(|| CartOpError::Unknown(s.to_string()))?;

                let quantity = quantity
                    .trim()
                    .parse::<i64>()
                    .map_err(|_err| CartOpError::InvalidNumber(s.to_string()))?;

                Ok(CartOp::Set(parse_id(id)?, quantity))
            }
            _ => Err(CartOpError::Unknown(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_operation() -> Result<(), CartOpError> {
        assert_eq!(
            "add:1".parse::<CartOp>()?,
            CartOp::Add(ProductId::new(1), NonZeroU32::MIN)
        );
        assert_eq!(
            "add:4x3".parse::<CartOp>()?,
            CartOp::Add(ProductId::new(4), NonZeroU32::MIN.saturating_add(2))
        );
        assert_eq!(
            "set:1=5".parse::<CartOp>()?,
            CartOp::Set(ProductId::new(1), 5)
        );
        assert_eq!(
            "set:2=-1".parse::<CartOp>()?,
            CartOp::Set(ProductId::new(2), -1)
        );
        assert_eq!(
            "remove:3".parse::<CartOp>()?,
            CartOp::Remove(ProductId::new(3))
        );

        Ok(())
    }

    #[test]
    fn rejects_unknown_operations() {
        assert_eq!(
            "buy:1".parse::<CartOp>(),
            Err(CartOpError::Unknown("buy:1".to_string()))
        );
        assert_eq!(
            "add".parse::<CartOp>(),
            Err(CartOpError::Unknown("add".to_string()))
        );
        assert_eq!(
            "set:1".parse::<CartOp>(),
            Err(CartOpError::Unknown("set:1".to_string()))
        );
    }

    #[test]
    fn rejects_invalid_numbers() {
        assert_eq!(
            "add:rice".parse::<CartOp>(),
            Err(CartOpError::InvalidNumber("add:rice".to_string()))
        );
        assert_eq!(
            "set:1=lots".parse::<CartOp>(),
            Err(CartOpError::InvalidNumber("set:1=lots".to_string()))
        );
        assert_eq!(
            "add:1x0".parse::<CartOp>(),
            Err(CartOpError::InvalidNumber("add:1x0".to_string()))
        );
        assert_eq!(
            "add:1x-2".parse::<CartOp>(),
            Err(CartOpError::InvalidNumber("add:1x-2".to_string()))
        );
    }
}
