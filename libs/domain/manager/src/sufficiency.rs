// [libs/domain/manager/src/sufficiency.rs]

/// Resultado de una consulta de suficiencia: puramente de lectura.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sufficiency {
    pub sufficient: bool,
    pub current: i64,
    pub required: i64,
    pub shortfall: i64,
}

impl Sufficiency {
    pub fn evaluate(current: i64, required: i64) -> Self {
        let sufficient = current >= required;
        Self {
            sufficient,
            current,
            required,
            shortfall: if sufficient { 0 } else { required - current },
        }
    }
}
