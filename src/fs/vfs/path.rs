//! Parsing de caminhos

/// Iterador sobre componentes de caminho.
///
/// Separadores repetidos não geram componentes vazios.
pub struct PathComponents<'a> {
    remaining: &'a str,
}

impl<'a> PathComponents<'a> {
    pub fn new(path: &'a str) -> Self {
        Self { remaining: path }
    }
}

impl<'a> Iterator for PathComponents<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining.is_empty() {
                return None;
            }

            let component = match self.remaining.find('/') {
                Some(pos) => {
                    let component = &self.remaining[..pos];
                    self.remaining = &self.remaining[pos + 1..];
                    component
                }
                None => core::mem::take(&mut self.remaining),
            };

            if !component.is_empty() {
                return Some(component);
            }
        }
    }
}

/// Verifica se caminho é absoluto
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/')
}
