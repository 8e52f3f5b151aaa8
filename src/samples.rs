/// A named example record
#[derive(Debug, Clone, Copy)]
pub struct SampleRecord {
    pub name: &'static str,
    pub text: &'static str,
}

pub const BASIC: SampleRecord = SampleRecord {
    name: "基本测试 - 包含症状和体征",
    text: "2023年09月28日，患者头晕，体重下降6kg，尿量减少。血压120/80mmHg，脉搏80次/分。",
};

pub const INCOMPLETE_DIALYSIS: SampleRecord = SampleRecord {
    name: "透析记录 - 缺少关键信息",
    text: "2023年10月15日，患者进行血液透析治疗，使用肝素抗凝，透析过程中出现头晕、恶心症状。",
};

pub const COMPLETE_DIALYSIS: SampleRecord = SampleRecord {
    name: "完整透析记录",
    text: "2023年11月05日，患者进行血液透析治疗，透析器型号FX80，血流量250ml/min，透析液流量500ml/min，使用低分子肝素4000单位抗凝，透析时间4小时，超滤量2.5kg。透析前体重65kg，透析后体重62.5kg，透析前血压150/90mmHg，透析后血压130/80mmHg。内瘘杂音清晰，无并发症。",
};

/// Records run by the `demo` command
pub fn all() -> [SampleRecord; 3] {
    [BASIC, INCOMPLETE_DIALYSIS, COMPLETE_DIALYSIS]
}
