//! Fixed content of the movement guide: page header, table columns and the approval text.

use guia_types::NonEmptyText;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::layout::Align;

/// Prefix written before every monetary value.
pub const CURRENCY_MARKER: &str = "R$";

/// One centred line of the page header and the height of the cell it occupies (mm).
pub struct HeaderLine {
    pub text: &'static str,
    pub height: f32,
}

pub const HEADER_LINES: [HeaderLine; 4] = [
    HeaderLine {
        text: "MINISTÉRIO DA DEFESA",
        height: 6.0,
    },
    HeaderLine {
        text: "COMANDO DA AERONÁUTICA",
        height: 6.0,
    },
    HeaderLine {
        text: "GRUPAMENTO DE APOIO DE LAGOA SANTA",
        height: 6.0,
    },
    HeaderLine {
        text: "GUIA DE MOVIMENTAÇÃO DE BEM MÓVEL PERMANENTE ENTRE AS SEÇÕES DO GAPLS",
        height: 8.0,
    },
];

/// Vertical space after the header block (mm).
pub const HEADER_SPACING: f32 = 10.0;

/// A table column: title, width in mm and body alignment.
pub struct Column {
    pub title: &'static str,
    pub width: f32,
    pub align: Align,
}

pub const COLUMNS: [Column; 4] = [
    Column {
        title: "Nº BMP",
        width: 25.0,
        align: Align::Center,
    },
    Column {
        title: "Nomenclatura",
        width: 70.0,
        align: Align::Left,
    },
    Column {
        title: "Nº Série",
        width: 55.0,
        align: Align::Center,
    },
    Column {
        title: "Valor Atualizado",
        width: 35.0,
        align: Align::Right,
    },
];

/// Index of the wrapped column in [`COLUMNS`].
pub const DESCRIPTION_COLUMN: usize = 1;

/// One asset row of the table, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideRow {
    pub identifier: String,
    pub description: String,
    pub serial_number: String,
    pub value: Option<Decimal>,
}

impl GuideRow {
    /// Cell texts in column order.
    pub fn cells(&self) -> [String; 4] {
        [
            self.identifier.clone(),
            self.description.clone(),
            self.serial_number.clone(),
            format_value(self.value.as_ref()),
        ]
    }
}

/// The four names interpolated into the approval text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideFields {
    pub origin_section: NonEmptyText,
    pub destination_section: NonEmptyText,
    pub origin_authority: NonEmptyText,
    pub destination_authority: NonEmptyText,
}

/// Everything needed to lay out one guide.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideContent {
    pub rows: Vec<GuideRow>,
    pub fields: GuideFields,
}

/// Formats a monetary value as `R$ 1234,50`.
///
/// Values are rounded half away from zero to two decimals. A missing value yields an empty cell.
pub fn format_value(value: Option<&Decimal>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("{} {}", CURRENCY_MARKER, rounded.to_string().replace('.', ","))
}

/// Approval text with the four names filled in.
///
/// The signature blocks of the internal control agent and the director are fixed.
pub fn approval_text(fields: &GuideFields) -> String {
    format!(
        "\
Solicitação de Transferência:
Informo à Senhora Chefe do GAP-LS que os bens especificados estão inservíveis para uso neste setor, classificados como ociosos, recuperáveis, reparados ou novos - aguardando distribuição. Diante disso, solicito autorização para transferir o(s) Bem(ns) Móvel(is) Permanente(s) acima discriminado(s), atualmente sob minha guarda, para a Seção {destination_section}.

{origin_authority}
{origin_section}

Confirmação da Seção de Destino:
Estou ciente da movimentação informada acima e, devido à necessidade do setor, solicito à Senhora Dirigente Máximo autorização para manter sob minha guarda os Bens Móveis Permanentes especificados.

{destination_authority}
{destination_section}

DO AGENTE DE CONTROLE INTERNO AO DIRIGENTE MÁXIMO
Informo à Senhora que, após conferência, foi verificado que esta guia cumpre o disposto no Módulo D do RADA-e e, conforme a alínea \"d\" do item 5.3 da ICA 179-1, encaminho para apreciação e se for o caso, autorização.

KARINA RAQUEL VALIMAREANU  Maj Int
Chefe da ACI

DESPACHO DA AGENTE DIRETOR
Autorizo a movimentação solicitada e determino:
1. Que a Seção de Registro realize a movimentação no SILOMS.
2. Que a Seção de Registro publique a movimentação no próximo aditamento a ser confeccionado, conforme o item 2.14.2, Módulo do RADA-e.
3. Que os detentores realizem a movimentação física do(s) bem(ns).

LUCIANA DO AMARAL CORREA  Cel Int
Dirigente Máximo",
        destination_section = fields.destination_section,
        origin_authority = fields.origin_authority,
        origin_section = fields.origin_section,
        destination_authority = fields.destination_authority,
    )
}
