//! Shared fixtures for pipeline tests.

#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use billscan_core::store::StoreResult;
use billscan_core::{
    list_documents, BillError, BillRecord, BillStore, DocumentSource, PageSelection, Result,
    StoreError,
};

/// Plain-text bills with pages separated by form feeds, as `pdftotext` writes them.
#[derive(Debug, Default)]
pub struct FormFeedSource {
    selection: PageSelection,
}

impl DocumentSource for FormFeedSource {
    fn list(&self, folder: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        list_documents(folder, pattern)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|source| BillError::FileAccess {
            path: path.to_path_buf(),
            source,
        })
    }

    fn text(&self, _path: &Path, bytes: &[u8]) -> Result<String> {
        let text = String::from_utf8_lossy(bytes);
        Ok(self.selection.apply(text.split('\x0c')))
    }
}

/// Source that refuses to read the named files.
pub struct Unreadable<D> {
    pub inner: D,
    pub names: Vec<&'static str>,
}

impl<D: DocumentSource> DocumentSource for Unreadable<D> {
    fn list(&self, folder: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        self.inner.list(folder, pattern)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if self.names.iter().any(|n| *n == name) {
            return Err(BillError::FileAccess {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
            });
        }
        self.inner.read(path)
    }

    fn text(&self, path: &Path, bytes: &[u8]) -> Result<String> {
        self.inner.text(path, bytes)
    }
}

/// Store whose calls always fail.
pub struct BrokenStore {
    pub fail_exists: bool,
}

impl BillStore for BrokenStore {
    fn exists(&self, _fingerprint: &str) -> StoreResult<bool> {
        if self.fail_exists {
            Err(StoreError::Backend("connection refused".to_string()))
        } else {
            Ok(false)
        }
    }

    fn save(&self, _record: &BillRecord, _fingerprint: &str, _serialized: &str) -> StoreResult<()> {
        Err(StoreError::Backend("disk full".to_string()))
    }
}

/// Body of a bill's data page.
pub struct BillPage<'a> {
    pub period: &'a str,
    pub units: u32,
    pub base_price: &'a str,
    pub discount: &'a str,
    pub total: &'a str,
    pub notice: &'a str,
}

impl Default for BillPage<'_> {
    fn default() -> Self {
        Self {
            period: "01 Jan 2025 to 31 Jan 2025",
            units: 150,
            base_price: "0,150000",
            discount: "0,000000",
            total: "45,30",
            notice: "",
        }
    }
}

impl BillPage<'_> {
    /// Full three-page document: cover, data page, legal page.
    pub fn document(&self) -> String {
        format!(
            "Cliente: Maria Silva\nNIF 123456789\n\x0c\
             Detalhe da fatura\n\
             Período de faturação: {}\n\
             Consumo total: {} kWh\n\
             Preço unitário: {} €/kWh\n\
             Desconto: {} €/kWh\n\
             Valor da energia: 22,50 €\n\
             Taxas e impostos: 22,80 €\n\
             Total a pagar: {} €\n\
             {}\n\x0c\
             Informação legal\n",
            self.period, self.units, self.base_price, self.discount, self.total, self.notice
        )
    }
}

pub fn write_doc(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Build a PDF with one page per entry; each line is its own `Tj`, stepped down with `Td`.
pub fn pdf_document(pages: &[Vec<String>]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 780.into()]),
        ];
        for line in lines {
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line.as_str())],
            ));
            operations.push(Operation::new("Td", vec![0.into(), (-24).into()]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

impl BillPage<'_> {
    /// Four-page PDF: a cover carrying decoy values, the bill data split over
    /// pages 2 and 3, then a legal page.
    pub fn pdf(&self) -> Vec<u8> {
        let mut details = vec!["Detalhe da fatura".to_string()];
        if !self.period.is_empty() {
            details.push(format!("Periodo de faturacao: {}", self.period));
        }
        details.extend([
            format!("Consumo total: {} kWh", self.units),
            format!("Preco unitario: {} EUR/kWh", self.base_price),
            format!("Desconto: {} EUR/kWh", self.discount),
        ]);

        let mut charges = vec![
            "Valor da energia: 22,50 EUR".to_string(),
            "Taxas e impostos: 22,80 EUR".to_string(),
            format!("Total a pagar: {} EUR", self.total),
        ];
        if !self.notice.is_empty() {
            charges.push(self.notice.to_string());
        }

        pdf_document(&[
            vec![
                "Cliente: Maria Silva".to_string(),
                "Fatura anterior: 01 Dez 2024 a 31 Dez 2024".to_string(),
                "Total a pagar: 999,99 EUR".to_string(),
            ],
            details,
            charges,
            vec![
                "Informacao legal".to_string(),
                "Desconto: 9,999999".to_string(),
            ],
        ])
    }
}

pub fn write_pdf(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
