//! A trimmed CF-e SAT model shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use dfe_serde::{DfeEnum, DfeObject, DfeSerializer, SerializerOptions, dfe_interface};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const CFE_NAMESPACE: &str = "http://www.fazenda.sp.gov.br/sat";

#[derive(Debug, Default, DfeObject)]
#[dfe(root = "CFe", namespace = "http://www.fazenda.sp.gov.br/sat", alternates("CFeCanc"))]
pub struct Cfe {
    #[dfe(element = "infCFe")]
    pub inf_cfe: InfCfe,
}

#[derive(Debug, Default, DfeObject)]
pub struct InfCfe {
    #[dfe(attribute = "versaoDadosEnt", id = "A02")]
    pub versao: String,

    #[dfe(attribute = "Id", id = "A03", occurrence = OptionalIfNull)]
    pub id: Option<String>,

    #[dfe(element = "ide", order = 1)]
    pub ide: Ide,

    #[dfe(element = "det", id = "H01", order = 3, min = 1, max = 500)]
    pub det: Vec<Det>,

    #[dfe(element = "emit", order = 2)]
    pub emit: Emit,

    #[dfe(
        element = "obsFisco",
        order = 5,
        occurrence = OptionalIfNull,
        dictionary(item = "obs", key(tag = "xCampo", attribute), value(tag = "xTexto"))
    )]
    pub obs_fisco: BTreeMap<String, String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, DfeEnum)]
pub enum TipoAmbiente {
    #[default]
    #[dfe(value = "1")]
    Producao,
    #[dfe(value = "2")]
    Homologacao,
}

#[derive(Debug, Default, DfeObject)]
pub struct Ide {
    #[dfe(element = "cUF", id = "B02", kind = Int, min = 2, max = 2)]
    pub c_uf: i32,

    #[dfe(element = "dEmi", id = "B09", kind = DatCFe)]
    pub d_emi: NaiveDate,

    #[dfe(element = "hEmi", id = "B10", kind = HorCFe)]
    pub h_emi: NaiveTime,

    #[dfe(element = "tpAmb", id = "B11", kind = Enum)]
    pub tp_amb: TipoAmbiente,
}

#[derive(Debug, Default, DfeObject)]
pub struct Emit {
    #[dfe(element = "CNPJ", id = "C02", kind = StrNumber, min = 14, max = 14)]
    pub cnpj: String,

    #[dfe(element = "xNome", id = "C03", max = 60, occurrence = OptionalIfNull)]
    pub x_nome: Option<String>,
}

#[derive(Debug, Default, DfeObject)]
pub struct Det {
    #[dfe(attribute = "nItem", id = "H02", kind = Int)]
    pub n_item: i32,

    #[dfe(element = "prod")]
    pub prod: Prod,

    #[dfe(element = "imposto")]
    pub imposto: Imposto,

    #[dfe(element = "infAdProd", id = "V01", max = 500, occurrence = OptionalIfNull)]
    pub inf_ad_prod: Option<String>,
}

#[derive(Debug, Default, DfeObject)]
pub struct Prod {
    #[dfe(element = "cProd", id = "I02", min = 1, max = 60)]
    pub c_prod: String,

    #[dfe(element = "xProd", id = "I04", min = 1, max = 120)]
    pub x_prod: String,

    #[dfe(element = "qCom", id = "I10", kind = De4)]
    pub q_com: Decimal,

    #[dfe(element = "vUnCom", id = "I11", kind = De2)]
    pub v_un_com: Decimal,
}

#[derive(Debug, Default, DfeObject)]
pub struct Imposto {
    #[dfe(element = "vItem12741", id = "M02", kind = De2, occurrence = RequiredIfNonZero)]
    pub v_item12741: Decimal,

    #[dfe(element = "PIS", id = "Q01")]
    pub pis: Pis,
}

/// `<PIS>` wraps exactly one of the PIS groups.
#[derive(Debug, Default, DfeObject)]
pub struct Pis {
    pub group: Option<Box<dyn CfePis>>,
}

pub trait CfePis: DfeObject {}

#[derive(Debug, Default, DfeObject)]
#[dfe(root = "PISAliq")]
pub struct ImpostoPisAliq {
    #[dfe(element = "CST", id = "Q07", min = 2, max = 2)]
    pub cst: String,

    #[dfe(element = "vBC", id = "Q08", kind = De2, min = 3, max = 15)]
    pub v_bc: Decimal,

    #[dfe(element = "pPIS", id = "Q09", kind = De4, min = 5, max = 6)]
    pub p_pis: Decimal,

    #[dfe(element = "vPIS", id = "Q10", kind = De2, min = 1, max = 15, occurrence = RequiredIfNonZero)]
    pub v_pis: Decimal,
}

#[derive(Debug, Default, DfeObject)]
#[dfe(root = "PISNT")]
pub struct ImpostoPisNt {
    #[dfe(element = "CST", id = "Q07", min = 2, max = 2)]
    pub cst: String,
}

impl CfePis for ImpostoPisAliq {}
impl CfePis for ImpostoPisNt {}

dfe_interface!(CfePis => ImpostoPisAliq, ImpostoPisNt);

pub fn serializer() -> DfeSerializer {
    serializer_with(SerializerOptions::default())
}

pub fn serializer_with(options: SerializerOptions) -> DfeSerializer {
    DfeSerializer::new(options).with_interface::<dyn CfePis>()
}

pub fn item(n_item: i32, c_prod: &str, pis: Box<dyn CfePis>) -> Det {
    Det {
        n_item,
        prod: Prod {
            c_prod: c_prod.to_string(),
            x_prod: format!("Produto {}", c_prod),
            q_com: dec!(1.5),
            v_un_com: dec!(10),
        },
        imposto: Imposto {
            v_item12741: Decimal::ZERO,
            pis: Pis { group: Some(pis) },
        },
        inf_ad_prod: None,
    }
}

pub fn pis_aliq() -> Box<dyn CfePis> {
    Box::new(ImpostoPisAliq {
        cst: "01".to_string(),
        v_bc: dec!(15.00),
        p_pis: dec!(0.0165),
        v_pis: dec!(0.25),
    })
}

pub fn pis_nt() -> Box<dyn CfePis> {
    Box::new(ImpostoPisNt {
        cst: "04".to_string(),
    })
}

/// A three-item coupon.
pub fn sample_cfe() -> Cfe {
    Cfe {
        inf_cfe: InfCfe {
            versao: "0.08".to_string(),
            id: None,
            ide: Ide {
                c_uf: 35,
                d_emi: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default(),
                h_emi: NaiveTime::from_hms_opt(14, 5, 0).unwrap_or_default(),
                tp_amb: TipoAmbiente::Homologacao,
            },
            det: vec![
                item(1, "A1", pis_aliq()),
                item(2, "B2", pis_nt()),
                item(3, "C3", pis_aliq()),
            ],
            emit: Emit {
                cnpj: "11.111.111/0001-11".to_string(),
                x_nome: Some("Padaria São João".to_string()),
            },
            obs_fisco: BTreeMap::new(),
        },
    }
}
